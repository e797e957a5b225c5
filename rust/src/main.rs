//! Command line front end for editing `.fwknoprc` files and generating keys.
//! Every command goes through a [`Session`], the same way a graphical editor
//! would.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use fwknop_rc::keys::generator::encode_base64;
use fwknop_rc::keys::KeyLength;
use fwknop_rc::prefs::{JsonPreferences, Preferences, PrefsError};
use fwknop_rc::registry::IdentityLabels;
use fwknop_rc::{Session, SessionError, SettingKey, ValueType};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "fwknop-rc", version, about = "Edit fwknop client rc files and generate keys")]
struct Cli {
    /// Preferences file (defaults to $FWKNOP_RC_PREFS or ~/.fwknop-rc/preferences.json)
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the settings stored in an rc file
    Show {
        rc: PathBuf,
        /// Print passphrases and keys instead of masking them
        #[arg(long)]
        reveal: bool,
    },
    /// Print one setting
    Get { rc: PathBuf, name: SettingKeyArg },
    /// Set one setting, creating the rc file when it does not exist
    Set {
        rc: PathBuf,
        name: SettingKeyArg,
        value: String,
    },
    /// Remove one setting
    Unset { rc: PathBuf, name: SettingKeyArg },
    /// Generate a key sized from the configured key lengths
    Keygen {
        #[arg(value_enum, default_value_t = KeyKind::Rijndael)]
        kind: KeyKind,
        /// Store the key in this rc file under the matching setting
        #[arg(long)]
        write: Option<PathBuf>,
    },
    /// Base64-encode a passphrase
    Encode { passphrase: String },
    /// List every known setting with its type and server-side name
    Settings,
    /// Print the settings that map onto server access.conf names
    Remote { rc: PathBuf },
    /// Show or change the key lengths used by keygen
    Lengths {
        /// KIND=LENGTH, may be repeated
        #[arg(long = "set", value_parser = parse_length_assignment)]
        assignments: Vec<(KeyKind, String)>,
    },
    /// List recently opened rc files
    Recent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KeyKind {
    Rijndael,
    Hmac,
    Base64Rijndael,
    Base64Hmac,
}

impl From<KeyKind> for KeyLength {
    fn from(kind: KeyKind) -> Self {
        match kind {
            KeyKind::Rijndael => KeyLength::Rijndael,
            KeyKind::Hmac => KeyLength::Hmac,
            KeyKind::Base64Rijndael => KeyLength::Base64Rijndael,
            KeyKind::Base64Hmac => KeyLength::Base64Hmac,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SettingKeyArg(SettingKey);

impl std::str::FromStr for SettingKeyArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.to_ascii_uppercase()
            .parse::<SettingKey>()
            .map(SettingKeyArg)
            .map_err(|e| e.to_string())
    }
}

fn parse_length_assignment(s: &str) -> Result<(KeyKind, String), String> {
    let (kind, length) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KIND=LENGTH, got {s:?}"))?;
    let kind = KeyKind::from_str(kind.trim(), true)?;
    Ok((kind, length.trim().to_string()))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "fwknop_rc=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_preferences(path: Option<PathBuf>) -> Result<JsonPreferences, PrefsError> {
    let path = match path {
        Some(path) => path,
        None => JsonPreferences::default_path()?,
    };
    JsonPreferences::load(path)
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let prefs = match open_preferences(cli.prefs) {
        Ok(prefs) => prefs,
        Err(err) => {
            eprintln!("preferences unavailable: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::open(prefs);
    match run(&mut session, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run<P: Preferences>(session: &mut Session<P>, command: Command) -> Result<(), SessionError> {
    match command {
        Command::Show { rc, reveal } => {
            for (key, value) in session.load_rc_file(&rc)?.iter() {
                let shown = if reveal || !is_secret(key) { value } else { "********" };
                println!("{:<23} {}", key.as_str(), shown);
            }
        }
        Command::Get { rc, name } => {
            if let Some(value) = session.load_rc_file(&rc)?.get(name.0) {
                println!("{value}");
            }
        }
        Command::Set { rc, name, value } => {
            update_setting(session, &rc, name.0, Some(value))?;
        }
        Command::Unset { rc, name } => {
            update_setting(session, &rc, name.0, None)?;
        }
        Command::Keygen { kind, write } => {
            let length = KeyLength::from(kind);
            let key = session.generate_key(length)?;
            match write {
                Some(rc) => {
                    update_setting(session, &rc, length.target(), Some(key))?;
                    println!("{} written to {}", length.target(), rc.display());
                }
                None => println!("{key}"),
            }
        }
        Command::Encode { passphrase } => println!("{}", encode_base64(&passphrase)),
        Command::Settings => {
            for key in SettingKey::ALL {
                let remote = key.remote_key().map(|r| r.as_str()).unwrap_or("-");
                let label = key.label(&IdentityLabels);
                println!(
                    "{:<23} {:<18} {:<18} {}",
                    key.as_str(),
                    format!("{:?}", key.value_type()),
                    remote,
                    label
                );
            }
        }
        Command::Remote { rc } => {
            session.load_rc_file(&rc)?;
            for (remote, value) in session.remote_view() {
                println!("{:<18} {}", remote.as_str(), value);
            }
        }
        Command::Lengths { assignments } => {
            if !assignments.is_empty() {
                for (kind, length) in assignments {
                    session.key_settings_mut().set(kind.into(), length);
                }
                for length in KeyLength::ALL {
                    session.key_settings().length(length)?;
                }
                session.save_key_settings()?;
            }
            for length in KeyLength::ALL {
                let value = session.key_settings().get(length).unwrap_or("-");
                println!("{:<28} {}", length.pref_key(), value);
            }
        }
        Command::Recent => {
            for path in session.recent_files() {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

/// Loads `rc` when present (starting empty otherwise), applies one change and
/// writes the result back.
fn update_setting<P: Preferences>(
    session: &mut Session<P>,
    rc: &Path,
    key: SettingKey,
    value: Option<String>,
) -> Result<(), SessionError> {
    let existing = rc.exists();
    let mut view: Vec<(SettingKey, Option<String>)> = if existing {
        session
            .load_rc_file(rc)?
            .iter()
            .map(|(k, v)| (k, Some(v.to_string())))
            .collect()
    } else {
        session.new_config();
        Vec::new()
    };
    view.retain(|(k, _)| *k != key);
    view.push((key, value));

    if existing {
        session.save(view)
    } else {
        session.save_as(view, rc)
    }
}

fn is_secret(key: SettingKey) -> bool {
    matches!(key.value_type(), ValueType::Passphrase | ValueType::Base64Passphrase)
}
