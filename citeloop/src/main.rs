use citeloop::commands::command_argument_builder;
use citeloop::handlers::{AuditArgs, handle_audit, init_logging};
use citeloop_core::print_banner;

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();
    let args = AuditArgs::from_matches(&matches);

    init_logging(args.verbosity);
    if !args.quiet {
        print_banner();
    }

    let code = handle_audit(&args).await;
    std::process::exit(code);
}
