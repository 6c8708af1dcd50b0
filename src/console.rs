//! Handling the beampath CLI
//!
//! This module handles the command line parsing as well as the interactive shell which replaces the slider and checkbox
//! panel of a graphical user interface. Each accepted command modifies the configuration of a [`Session`] and triggers
//! a new recompute-and-render cycle.
use std::{
    io::{BufRead, ErrorKind, Write},
    path::PathBuf,
    str::FromStr,
};

use clap::{builder::Str, Parser};
use log::{debug, warn};
use rprompt::prompt_reply_from_bufread;
use strum::{EnumIter, EnumString, IntoEnumIterator};
use uom::si::{f64::Length, length::meter};

use crate::{
    error::{BeamPathError, BpResult},
    get_version,
    session::{Renderer, Session},
};

const PROMPT: &str = "beampath> ";
const MAX_WRONG_INPUTS: usize = 3;

/// Command line arguments for the beampath application.
#[derive(Parser, Debug)]
#[command(author, version = Str::from(get_version()), about, long_about = None)]
pub struct Args {
    /// configuration file (YAML or JSON) to start with. If not given, the reference configuration is used
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// file the beam path plot is written to (.svg, .png or .bmp)
    #[arg(short, long, default_value = "beam_path.svg")]
    pub output: PathBuf,

    /// optional CSV file receiving all ray samples
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// render once and exit without starting the interactive shell
    #[arg(short, long)]
    pub batch: bool,

    /// print informational log messages
    #[arg(short, long)]
    pub verbose: bool,
}

/// The keywords understood by the interactive shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString)]
pub enum Keyword {
    /// set the distance of a gap
    #[strum(serialize = "d")]
    Distance,
    /// set the focal length of a lens
    #[strum(serialize = "f")]
    FocalLength,
    /// enable / disable a lens
    #[strum(serialize = "toggle")]
    Toggle,
    /// set the divergence constant
    #[strum(serialize = "k")]
    Divergence,
    /// set the beam sampling
    #[strum(serialize = "rays")]
    Rays,
    /// print the configuration
    #[strum(serialize = "show")]
    Show,
    /// save the configuration
    #[strum(serialize = "save")]
    Save,
    /// print the help text
    #[strum(serialize = "help")]
    Help,
    /// leave the shell
    #[strum(serialize = "quit")]
    Quit,
}
impl Keyword {
    const fn usage(self) -> &'static str {
        match self {
            Self::Distance => "d <n> <meter>",
            Self::FocalLength => "f <n> <meter>",
            Self::Toggle => "toggle <n>",
            Self::Divergence => "k <rad/m>",
            Self::Rays => "rays <count> <half width>",
            Self::Show => "show",
            Self::Save => "save <file>",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
    const fn description(self) -> &'static str {
        match self {
            Self::Distance => "set the distance of gap n (the last gap leads to the observation plane)",
            Self::FocalLength => "set the focal length of lens n",
            Self::Toggle => "enable or disable lens n",
            Self::Divergence => "set the divergence constant (initial angle = k * x0)",
            Self::Rays => "set the number of rays and the half width of the beam [m]",
            Self::Show => "print the current configuration",
            Self::Save => "save the current configuration (YAML or JSON)",
            Self::Help => "print this help",
            Self::Quit => "leave the shell",
        }
    }
}

/// A parsed shell command. Lens and gap numbers are zero-based.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// set the distance of gap `gap`
    Distance {
        /// index of the gap
        gap: usize,
        /// new distance
        distance: Length,
    },
    /// set the focal length of lens `lens`
    FocalLength {
        /// index of the lens
        lens: usize,
        /// new focal length
        focal_length: Length,
    },
    /// flip the enable flag of lens `lens`
    Toggle {
        /// index of the lens
        lens: usize,
    },
    /// set the divergence constant in rad/m
    Divergence(f64),
    /// set the beam sampling
    Rays {
        /// number of rays
        count: usize,
        /// half width of the beam
        half_width: Length,
    },
    /// print the configuration
    Show,
    /// save the configuration to the given file
    Save(PathBuf),
    /// print the help text
    Help,
    /// leave the shell
    Quit,
}

fn console_error(msg: impl Into<String>) -> BeamPathError {
    BeamPathError::Console(msg.into())
}
fn parse_number(word: Option<&str>, name: &str) -> BpResult<f64> {
    let word = word.ok_or_else(|| console_error(format!("missing {name}")))?;
    f64::from_str(word).map_err(|_| console_error(format!("invalid {name}: {word}")))
}
fn parse_count(word: Option<&str>, name: &str) -> BpResult<usize> {
    let word = word.ok_or_else(|| console_error(format!("missing {name}")))?;
    usize::from_str(word).map_err(|_| console_error(format!("invalid {name}: {word}")))
}
/// Parse a one-based lens or gap number and return the zero-based index.
fn parse_index(word: Option<&str>, name: &str) -> BpResult<usize> {
    let number = parse_count(word, name)?;
    number
        .checked_sub(1)
        .ok_or_else(|| console_error(format!("{name} numbers start at 1")))
}

impl FromStr for Command {
    type Err = BeamPathError;

    fn from_str(line: &str) -> BpResult<Self> {
        let mut words = line.split_whitespace();
        let keyword = words.next().ok_or_else(|| console_error("empty input"))?;
        let keyword = Keyword::from_str(keyword)
            .map_err(|_| console_error(format!("unknown command: {keyword}. Type \"help\" for a list of commands")))?;
        let command = match keyword {
            Keyword::Distance => Self::Distance {
                gap: parse_index(words.next(), "gap")?,
                distance: Length::new::<meter>(parse_number(words.next(), "distance")?),
            },
            Keyword::FocalLength => Self::FocalLength {
                lens: parse_index(words.next(), "lens")?,
                focal_length: Length::new::<meter>(parse_number(words.next(), "focal length")?),
            },
            Keyword::Toggle => Self::Toggle {
                lens: parse_index(words.next(), "lens")?,
            },
            Keyword::Divergence => Self::Divergence(parse_number(words.next(), "divergence")?),
            Keyword::Rays => Self::Rays {
                count: parse_count(words.next(), "number of rays")?,
                half_width: Length::new::<meter>(parse_number(words.next(), "half width")?),
            },
            Keyword::Show => Self::Show,
            Keyword::Save => Self::Save(PathBuf::from(
                words
                    .next()
                    .ok_or_else(|| console_error("missing file name"))?,
            )),
            Keyword::Help => Self::Help,
            Keyword::Quit => Self::Quit,
        };
        if let Some(extra) = words.next() {
            return Err(console_error(format!(
                "unexpected argument: {extra}. Usage: {}",
                keyword.usage()
            )));
        }
        Ok(command)
    }
}

/// Returns the help text listing all shell commands.
#[must_use]
pub fn create_help() -> String {
    let mut help = String::from("Commands (lenses and gaps are numbered starting at 1):\n");
    for keyword in Keyword::iter() {
        help += &format!("  {:<28}{}\n", keyword.usage(), keyword.description());
    }
    help
}

/// Returns the greeting shown when the interactive shell starts.
#[must_use]
pub fn create_intro() -> String {
    format!(
        "beampath {} - paraxial beam path visualization\nType \"help\" for a list of commands.\n",
        get_version()
    )
}

fn write_out(writer: &mut impl Write, text: &str) -> BpResult<()> {
    writeln!(writer, "{text}").map_err(|e| console_error(format!("cannot write to console: {e}")))
}

enum Flow {
    Continue,
    Quit,
}

/// Apply a configuration change and recompute. If anything fails, the previous configuration is restored.
///
/// A failed render may leave some outputs updated. These are rendered again from the restored configuration.
fn apply_change<R: Renderer>(
    session: &mut Session<R>,
    change: impl FnOnce(&mut Session<R>) -> BpResult<()>,
) -> BpResult<usize> {
    let previous = session.config().clone();
    let paths = match change(session).and_then(|()| session.trace()) {
        Ok(paths) => paths,
        Err(e) => {
            *session.config_mut() = previous;
            return Err(e);
        }
    };
    if let Err(e) = session.render(&paths) {
        *session.config_mut() = previous;
        if let Err(restore_err) = session.configuration_changed() {
            warn!("cannot restore previous output: {restore_err}");
        }
        return Err(e);
    }
    Ok(paths.len())
}

fn execute<R: Renderer>(
    session: &mut Session<R>,
    command: Command,
    writer: &mut impl Write,
) -> BpResult<Flow> {
    debug!("executing {command:?}");
    let changed = match command {
        Command::Distance { gap, distance } => apply_change(session, |s| {
            s.config_mut().set_distance(gap, distance).map(|_| ())
        })?,
        Command::FocalLength { lens, focal_length } => apply_change(session, |s| {
            s.config_mut()
                .set_focal_length(lens, focal_length)
                .map(|_| ())
        })?,
        Command::Toggle { lens } => apply_change(session, |s| {
            s.config_mut().toggle_lens(lens).map(|_| ())
        })?,
        Command::Divergence(divergence) => {
            apply_change(session, |s| s.config_mut().set_divergence(divergence))?
        }
        Command::Rays { count, half_width } => {
            apply_change(session, |s| s.config_mut().set_beam(count, half_width))?
        }
        Command::Show => {
            write_out(writer, &session.config().to_string())?;
            return Ok(Flow::Continue);
        }
        Command::Save(path) => {
            session.config().save_to_file(&path)?;
            write_out(writer, &format!("configuration saved to {}", path.display()))?;
            return Ok(Flow::Continue);
        }
        Command::Help => {
            write_out(writer, &create_help())?;
            return Ok(Flow::Continue);
        }
        Command::Quit => return Ok(Flow::Quit),
    };
    write_out(writer, &format!("{changed} rays traced"))?;
    Ok(Flow::Continue)
}

/// Run the interactive shell on the given session.
///
/// Commands are read line by line from `reader` (e.g. `stdin().lock()` for user input or a `BufReader` from a string
/// for tests). Prompts and messages are written into `writer`. The shell runs until `quit` is entered or the input ends.
///
/// # Errors
///
/// This function will return a [`BeamPathError::Console`] after three consecutive invalid inputs or if reading or
/// writing fails.
pub fn run_shell<R: Renderer>(
    session: &mut Session<R>,
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> BpResult<()> {
    let mut err_count: usize = 0;
    loop {
        let input = match prompt_reply_from_bufread(reader, writer, PROMPT) {
            Ok(input) => input,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) => return Err(console_error(format!("cannot read input: {e}"))),
        };
        if input.trim().is_empty() {
            continue;
        }
        let result = input
            .parse::<Command>()
            .and_then(|command| execute(session, command, writer));
        match result {
            Ok(Flow::Continue) => err_count = 0,
            Ok(Flow::Quit) => return Ok(()),
            Err(e) => {
                warn!("rejected input \"{}\": {e}", input.trim());
                write_out(writer, &format!("Invalid input! {e}"))?;
                err_count += 1;
                if err_count >= MAX_WRONG_INPUTS {
                    return Err(console_error(
                        "Too many wrong inputs! Program exits! Please type \"beampath -h\" for help!",
                    ));
                }
            }
        }
    }
}
