//! Command-line entry point for crymail.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crymail_core::config::{self, Config};
use crymail_core::{
    MailboxItem, SpoolTransport, Verification, generate_key_pair, receive_item,
    receive_mail_list, send_signed_mail, sign_message, verify_item, verify_signature,
};

#[derive(Parser)]
#[command(name = "crymail", version, about = "Send and check signed mail")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to $CRYMAIL_CONFIG or the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an RSA key pair at the configured key paths
    Keygen,
    /// Sign a message file, writing a detached signature
    Sign {
        /// Message file ("-" for stdin)
        message: PathBuf,
        /// Signature output file
        #[arg(short, long, default_value = "signature.bin")]
        output: PathBuf,
    },
    /// Check a detached signature against a message file
    Verify {
        /// Message file ("-" for stdin)
        message: PathBuf,
        /// Signature file
        #[arg(short, long, default_value = "signature.bin")]
        signature: PathBuf,
    },
    /// Update and save the configuration
    Configure {
        /// Sender address
        #[arg(long)]
        address: Option<String>,
        /// Directory sent messages are spooled to
        #[arg(long)]
        outbox: Option<PathBuf>,
        /// Directory messages are read from
        #[arg(long)]
        mailbox: Option<PathBuf>,
        /// Public key file
        #[arg(long)]
        public_key: Option<PathBuf>,
        /// Private key file
        #[arg(long)]
        private_key: Option<PathBuf>,
        /// Highest message index read by list/show
        #[arg(long)]
        max_messages: Option<u32>,
    },
    /// Sign and send a message
    Send {
        /// Recipient address
        to: String,
        /// Subject line
        subject: String,
        /// Message body file ("-" for stdin)
        message: PathBuf,
    },
    /// List messages in the mailbox
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one message and check its signature
    Show {
        /// Message index, starting at 1
        index: u32,
        #[arg(long)]
        json: bool,
    },
}

/// Values accepted by `configure`.
#[derive(Debug, Default)]
struct ConfigUpdate {
    address: Option<String>,
    outbox: Option<PathBuf>,
    mailbox: Option<PathBuf>,
    public_key: Option<PathBuf>,
    private_key: Option<PathBuf>,
    max_messages: Option<u32>,
}

impl ConfigUpdate {
    fn apply(self, config: &mut Config) {
        if let Some(address) = self.address {
            config.identity.address = address;
        }
        if let Some(outbox) = self.outbox {
            config.spool.outbox = outbox;
        }
        if let Some(mailbox) = self.mailbox {
            config.spool.mailbox = mailbox;
        }
        if let Some(public_key) = self.public_key {
            config.keys.public_key = public_key;
        }
        if let Some(private_key) = self.private_key {
            config.keys.private_key = private_key;
        }
        if let Some(max_messages) = self.max_messages {
            config.receive.max_messages = max_messages;
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .or_else(config::config_file_path)
        .context("could not determine the configuration file location")?;
    let loaded = config::load_config_from(&config_path);

    let log_level = match cli.verbose {
        0 => loaded
            .as_ref()
            .map_or("warn", |config| config.general.log_level.as_str()),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level);

    let config = loaded
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    match cli.command {
        Commands::Keygen => cmd_keygen(&config),
        Commands::Sign { message, output } => cmd_sign(&config, &message, &output),
        Commands::Verify { message, signature } => cmd_verify(&config, &message, &signature),
        Commands::Configure {
            address,
            outbox,
            mailbox,
            public_key,
            private_key,
            max_messages,
        } => {
            let update = ConfigUpdate {
                address,
                outbox,
                mailbox,
                public_key,
                private_key,
                max_messages,
            };
            cmd_configure(config, &config_path, update)
        }
        Commands::Send {
            to,
            subject,
            message,
        } => cmd_send(&config, &to, &subject, &message),
        Commands::List { json } => cmd_list(&config, json),
        Commands::Show { index, json } => cmd_show(&config, index, json),
    }
}

fn setup_logging(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads a message body from a file, or stdin for `-`.
fn read_message(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("failed to read message from stdin")?;
        return Ok(body);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn cmd_keygen(config: &Config) -> anyhow::Result<ExitCode> {
    generate_key_pair(&config.keys.public_key, &config.keys.private_key)?;
    println!("Public key:  {}", config.keys.public_key.display());
    println!("Private key: {}", config.keys.private_key.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_sign(config: &Config, message: &Path, output: &Path) -> anyhow::Result<ExitCode> {
    let body = read_message(message)?;
    let signature = sign_message(body.as_bytes(), &config.keys.private_key)?;
    std::fs::write(output, &signature)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Wrote {}-byte signature to {}",
        signature.len(),
        output.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_verify(config: &Config, message: &Path, signature: &Path) -> anyhow::Result<ExitCode> {
    let body = read_message(message)?;
    let signature = std::fs::read(signature)
        .with_context(|| format!("failed to read {}", signature.display()))?;

    let outcome = if verify_signature(body.as_bytes(), &signature, &config.keys.public_key)? {
        Verification::Valid
    } else {
        Verification::Tampered
    };
    println!("{outcome}");
    Ok(exit_code(outcome))
}

fn cmd_configure(
    mut config: Config,
    path: &Path,
    update: ConfigUpdate,
) -> anyhow::Result<ExitCode> {
    update.apply(&mut config);
    config::save_config_to(path, &config)?;
    println!("Saved {}", path.display());

    if let Err(errors) = config::validate_config(&config) {
        for error in &errors {
            eprintln!("warning: {}: {}", error.field(), error.message());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_send(config: &Config, to: &str, subject: &str, message: &Path) -> anyhow::Result<ExitCode> {
    let body = read_message(message)?;
    let mut transport = SpoolTransport::from_config(&config.spool);
    let raw = send_signed_mail(config, &mut transport, to, subject, &body)?;
    println!(
        "Sent {} bytes to {to} via {}",
        raw.len(),
        transport.outbox().display()
    );
    Ok(ExitCode::SUCCESS)
}

/// One line of `list` output.
#[derive(Serialize)]
struct Summary<'a> {
    index: u32,
    id: &'a str,
    from: &'a str,
    date: &'a str,
    subject: &'a str,
    signed: bool,
}

fn cmd_list(config: &Config, json: bool) -> anyhow::Result<ExitCode> {
    let mut transport = SpoolTransport::from_config(&config.spool);
    let mailbox = receive_mail_list(config, &mut transport)?;

    let summaries: Vec<Summary<'_>> = mailbox
        .iter()
        .map(|entry| Summary {
            index: entry.index,
            id: entry.item.identifier(),
            from: entry.item.sender(),
            date: entry.item.date(),
            subject: entry.item.subject(),
            signed: entry.item.signature_attached(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(ExitCode::SUCCESS);
    }

    if summaries.is_empty() {
        println!("Mailbox is empty");
    }
    for summary in &summaries {
        println!(
            "{:>3}  {}  {:<30}  {}  {}",
            summary.index,
            if summary.signed { "S" } else { "-" },
            summary.from,
            summary.date,
            summary.subject
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// `show --json` output.
#[derive(Serialize)]
struct Shown<'a> {
    index: u32,
    item: &'a MailboxItem,
    verification: Verification,
}

/// Retrieves one message straight from the mailbox, regardless of
/// `receive.max_messages`.
fn fetch_item(config: &Config, index: u32) -> anyhow::Result<MailboxItem> {
    let mut transport = SpoolTransport::from_config(&config.spool);
    receive_item(&mut transport, index)?.with_context(|| format!("no message at index {index}"))
}

fn cmd_show(config: &Config, index: u32, json: bool) -> anyhow::Result<ExitCode> {
    let item = fetch_item(config, index)?;
    let verification = verify_item(&item, &config.keys.public_key)?;

    if json {
        let shown = Shown {
            index,
            item: &item,
            verification,
        };
        println!("{}", serde_json::to_string_pretty(&shown)?);
    } else {
        println!("Message-ID: {}", item.identifier());
        println!("From:       {}", item.sender());
        println!("Date:       {}", item.date());
        println!("Subject:    {}", item.subject());
        println!();
        println!("{}", item.body());
        println!();
        println!("[{verification}]");
    }
    Ok(exit_code(verification))
}

const fn exit_code(verification: Verification) -> ExitCode {
    match verification {
        Verification::Tampered | Verification::Malformed => ExitCode::FAILURE,
        Verification::Valid | Verification::Unsigned => ExitCode::SUCCESS,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sign_defaults() {
        let cli = Cli::try_parse_from(["crymail", "sign", "msg.txt"]).unwrap();
        match cli.command {
            Commands::Sign { message, output } => {
                assert_eq!(message, PathBuf::from("msg.txt"));
                assert_eq!(output, PathBuf::from("signature.bin"));
            }
            _ => panic!("expected sign"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli =
            Cli::try_parse_from(["crymail", "list", "--json", "-vv", "--config", "c.toml"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(matches!(cli.command, Commands::List { json: true }));
    }

    #[test]
    fn test_parse_show_requires_index() {
        assert!(Cli::try_parse_from(["crymail", "show"]).is_err());
        assert!(Cli::try_parse_from(["crymail", "show", "two"]).is_err());
    }

    #[test]
    fn test_config_update_only_touches_given_fields() {
        let mut config = Config::default();
        let before = config.clone();

        ConfigUpdate {
            address: Some("alice@example.com".to_string()),
            max_messages: Some(3),
            ..ConfigUpdate::default()
        }
        .apply(&mut config);

        assert_eq!(config.identity.address, "alice@example.com");
        assert_eq!(config.receive.max_messages, 3);
        assert_eq!(config.spool, before.spool);
        assert_eq!(config.keys, before.keys);
    }

    #[test]
    fn test_read_message_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msg.txt");
        std::fs::write(&path, "pay 100\n").unwrap();
        assert_eq!(read_message(&path).unwrap(), "pay 100\n");
        assert!(read_message(&dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(Verification::Valid), ExitCode::SUCCESS);
        assert_eq!(exit_code(Verification::Unsigned), ExitCode::SUCCESS);
        assert_eq!(exit_code(Verification::Tampered), ExitCode::FAILURE);
        assert_eq!(exit_code(Verification::Malformed), ExitCode::FAILURE);
    }

    #[test]
    fn test_fetch_item_past_max_messages() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.spool.outbox = dir.path().to_path_buf();
        config.spool.mailbox = dir.path().to_path_buf();
        config.receive.max_messages = 8;

        for n in 1..=9 {
            std::fs::write(
                dir.path().join(format!("{n:06}.eml")),
                format!("Subject: message {n}\r\n\r\nbody {n}"),
            )
            .unwrap();
        }

        let item = fetch_item(&config, 9).unwrap();
        assert_eq!(item.subject(), "message 9");
        assert_eq!(item.body(), "body 9");

        let err = fetch_item(&config, 10).unwrap_err();
        assert!(err.to_string().contains("no message at index 10"));
    }
}
