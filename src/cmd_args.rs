use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Directory holding config.json, history.json and presets.json.
    /// Overrides CURLLINE_HOME and the platform default.
    #[clap(long, value_name = "DIR", help = "storage directory")]
    config_dir: Option<PathBuf>,

    #[clap(short = 'v', long, help = "log at debug level to stderr")]
    verbose: bool,

    #[clap(long, help = "disable coloured output")]
    no_color: bool,

    /// Rewrite quoting for cmd.exe even on non-Windows hosts
    #[clap(long, help = "use double-quote-only quoting")]
    windows_quoting: bool,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    config_dir: Option<PathBuf>,
    verbose: bool,
    no_color: bool,
    windows_quoting: bool,
}

impl CommandLineArgs {
    fn from_clap(args: ClapArgs) -> Self {
        Self {
            config_dir: args.config_dir,
            verbose: args.verbose,
            no_color: args.no_color,
            windows_quoting: args.windows_quoting,
        }
    }
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from_clap(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_clap(ClapArgs::parse_from(itr))
    }

    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn no_color(&self) -> bool {
        self.no_color
    }

    pub fn windows_quoting(&self) -> bool {
        self.windows_quoting
    }
}
