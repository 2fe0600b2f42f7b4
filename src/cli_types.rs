use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Linters to run (e.g. `-l flake8 pylint`)
    #[arg(short, long, num_args = 1..)]
    pub linters: Vec<String>,

    /// Quarto files or directories to lint
    #[arg(short, long, num_args = 1.., required = true)]
    pub paths: Vec<String>,

    /// Files, directories or glob patterns to exclude
    #[arg(short, long, num_args = 1..)]
    pub exclude: Vec<String>,

    /// Keep the generated .py files after linting
    #[arg(short, long, default_value = "false")]
    pub keep_temp: bool,

    /// Line length limit for noqa decisions (overrides the linter's own config)
    #[arg(long)]
    pub max_line_length: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Quarto document to convert
    pub input: PathBuf,

    /// Output .py file (defaults to the input path with a .py extension)
    pub output: Option<PathBuf>,

    /// Linter the output is intended for
    #[arg(short, long)]
    pub linter: String,
}
