use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_commands, OutputFormat};

pub fn run(format: OutputFormat) -> CliResult<i32> {
    print_commands(format);
    Ok(SUCCESS)
}
