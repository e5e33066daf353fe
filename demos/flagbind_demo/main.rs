//! # flagbind demo application
//!
//! A sample server launcher that binds its options with flagbind. It does not
//! start anything: it parses, prompts, and prints what it resolved.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example flagbind_demo -- --host 0.0.0.0 -I src -I lib -D mode=dev
//! cargo run --example flagbind_demo -- --show-usage --usage-style stacked
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                  | How to exercise it                                                 |
//! |--------------------------|--------------------------------------------------------------------|
//! | Arithmetic defaults      | `DEMO_PORT=8079 cargo run --example flagbind_demo -- --host x`     |
//! | Missing variables        | unset `DEMO_WORKERS` and `--workers` resolves to 0                 |
//! | Repeated flags           | `-I a -I b`, `-D k=v -D k=w`, `--port 1 --port 2`                  |
//! | Custom parser            | `--upstream '{"host": "db", "port": 5432}'`                        |
//! | Self-decoding type       | `--log-level debug`                                                |
//! | Prompting                | `--interactive` without `--host`                                   |
//! | Usage layouts            | `--show-usage`, `--usage-style stacked`, `--no-color`              |
//! | Settings from env        | `FLAGBIND_USAGE_STYLE=stacked ... --show-usage`                    |
//! | Debug logging            | `RUST_LOG=flagbind=debug cargo run --example flagbind_demo -- ...` |

mod options;

use clap::{Arg, ArgAction, Args, Command, FromArgMatches};
use tracing::info;

use flagbind::{BindError, FieldSet, Settings, TerminalPrompter, UsageArgs, apply_matches, to_args};

use options::ServerOptions;

fn command(set: &FieldSet<'_>) -> Result<Command, BindError> {
    let cmd = Command::new("flagbind-demo")
        .about("flagbind demo: a server launcher that only prints its options")
        .args(to_args(set)?)
        .arg(
            Arg::new("interactive")
                .long("interactive")
                .action(ArgAction::SetTrue)
                .help("Prompt for options that were not given"),
        )
        .arg(
            Arg::new("show-usage")
                .long("show-usage")
                .action(ArgAction::SetTrue)
                .help("Print flagbind's usage text and exit"),
        );
    Ok(UsageArgs::augment_args(cmd))
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{context}:\n{err}");
    std::process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load(None).unwrap_or_else(|e| fail("Failed to load settings", e));

    let mut opts = ServerOptions::default();
    {
        let mut set = FieldSet::new();
        opts.bind(&mut set)
            .unwrap_or_else(|e| fail("Failed to bind options", e));

        let matches = command(&set)
            .unwrap_or_else(|e| fail("Failed to build command line", e))
            .get_matches();
        let usage_args =
            UsageArgs::from_arg_matches(&matches).unwrap_or_else(|e| fail("Bad arguments", e));
        let settings = usage_args.apply(settings);

        if matches.get_flag("show-usage") {
            print!("{}", set.usage(settings.usage_style, &*settings.styler()));
            return;
        }

        apply_matches(&mut set, &matches).unwrap_or_else(|e| fail("Invalid option", e));
        if matches.get_flag("interactive") {
            set.prompt_unassigned(&mut TerminalPrompter::new())
                .unwrap_or_else(|e| fail("Prompt failed", e));
        }
        if let Err(e) = set.check_required() {
            eprint!("{}", set.usage(settings.usage_style, &*settings.styler()));
            fail("Missing options", e);
        }
        set.finish().unwrap_or_else(|e| fail("Invalid option", e));
    }

    info!(host = %opts.host, port = opts.port, "options resolved");
    println!("host       {}", opts.host);
    println!("port       {}", opts.port);
    println!("workers    {}", opts.workers);
    println!("includes   {:?}", opts.includes);
    println!("defines    {:?}", opts.defines);
    println!("upstream   {:?}", opts.upstream);
    println!("log level  {:?}", opts.log_level);
    println!("token      {}", if opts.token.is_empty() { "(none)" } else { "(set)" });
    println!("confirmed  {}", opts.assume_yes);
}
