pub mod args;
pub mod commands;
pub mod context;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use context::SocialGraphCliContext;
pub use output::{
    CliColors, describe_follow, format_error, format_info, format_success, format_warning,
    output_error, print_identity_list, print_violations,
};
