use std::path::PathBuf;

use crate::error::{AppError, AppResult};
use crate::mode::SignatureMode;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct StartupConfig {
    pub(crate) name: Option<String>,
    pub(crate) mode: SignatureMode,
    pub(crate) output: Option<PathBuf>,
}

impl StartupConfig {
    pub(crate) fn from_args() -> AppResult<Self> {
        Self::parse(std::env::args().skip(1))
    }

    pub(crate) fn parse<I>(args: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
                None => (arg, None),
            };
            match flag.as_str() {
                "--name" => config.name = Some(value_for(&flag, inline, &mut args)?),
                "--mode" => {
                    let value = value_for(&flag, inline, &mut args)?;
                    config.mode = value.parse().map_err(AppError::Usage)?;
                }
                "--output" | "-o" => {
                    config.output = Some(PathBuf::from(value_for(&flag, inline, &mut args)?));
                }
                other => {
                    tracing::warn!(arg = other, "ignoring unknown argument");
                }
            }
        }
        Ok(config)
    }
}

fn value_for(
    flag: &str,
    inline: Option<String>,
    args: &mut impl Iterator<Item = String>,
) -> AppResult<String> {
    inline
        .or_else(|| args.next())
        .ok_or_else(|| AppError::Usage(format!("{flag} requires a value")))
}

/// GTK only sees argv[0]; signpad flags would fail its option parsing.
pub(crate) fn gtk_launch_args() -> Vec<String> {
    std::env::args().take(1).collect()
}
