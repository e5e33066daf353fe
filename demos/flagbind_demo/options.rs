//! Options record for the flagbind demo application.
//!
//! Each field of [`ServerOptions`] is bound to one [`Tag`]. The tags are
//! written out by hand here; a real application would normally produce them
//! from a declarative description of its flags.
//!
//! | Flag                | Field           | Notes                                   |
//! |---------------------|-----------------|-----------------------------------------|
//! | `-H`, `--host`      | `host`          | prompted for when missing               |
//! | `-p`, `--port`      | `port`          | default `$DEMO_PORT+1`                  |
//! | `-w`, `--workers`   | `workers`       | default `$DEMO_WORKERS*2`               |
//! | `-I`, `--include`   | `includes`      | repeatable                              |
//! | `-D`                | `defines`       | repeatable `key=value`                  |
//! | `--upstream`        | `upstream`      | JSON, decoded with `JsonParser`         |
//! | `--log-level`       | `log_level`     | self-decoding type                      |
//! | `--token`           | `token`         | password prompt                         |
//! | `-y`, `--yes`       | `assume_yes`    | yes/no prompt                           |

use std::collections::BTreeMap;

use serde::Deserialize;

use flagbind::{BindError, Decode, DecodeError, FieldSet, JsonParser, Tag};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    #[default]
    Info,
    Debug,
    Trace,
}

impl Decode for LogLevel {
    fn decode(&mut self, raw: &str) -> Result<(), DecodeError> {
        *self = match raw.to_ascii_lowercase().as_str() {
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            other => return Err(format!("unknown log level '{other}'").into()),
        };
        Ok(())
    }
}

flagbind::decode_field!(LogLevel);

#[derive(Debug, Default, PartialEq, Deserialize)]
pub struct Upstream {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Default)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
    pub workers: u32,
    pub includes: Vec<String>,
    pub defines: BTreeMap<String, String>,
    pub upstream: Upstream,
    pub log_level: LogLevel,
    pub token: String,
    pub assume_yes: bool,
}

impl ServerOptions {
    /// Bind every field into `set`, in display order.
    pub fn bind<'a>(&'a mut self, set: &mut FieldSet<'a>) -> Result<(), BindError> {
        set.bind(
            &Tag::new()
                .short("-H")
                .long("--host")
                .placeholder("HOST")
                .usage("address to listen on")
                .required()
                .prompt("Host"),
            &mut self.host,
        )?;
        set.bind(
            &Tag::new()
                .short("-p")
                .long("--port")
                .placeholder("PORT")
                .default_value("$DEMO_PORT+1")
                .usage("listen port")
                .prompt("Port"),
            &mut self.port,
        )?;
        set.bind(
            &Tag::new()
                .short("-w")
                .long("--workers")
                .placeholder("N")
                .default_value("$DEMO_WORKERS*2")
                .usage("worker threads"),
            &mut self.workers,
        )?;
        set.bind(
            &Tag::new()
                .short("-I")
                .long("--include")
                .placeholder("DIR")
                .usage("include directory, repeatable"),
            &mut self.includes,
        )?;
        set.bind(
            &Tag::new()
                .short("-D")
                .placeholder("KEY=VALUE")
                .usage("define a variable, repeatable"),
            &mut self.defines,
        )?;
        set.bind_with_parser(
            &Tag::new()
                .long("--upstream")
                .placeholder("JSON")
                .usage("upstream as {\"host\": ..., \"port\": ...}"),
            &mut self.upstream,
            JsonParser::new(),
        )?;
        set.bind(
            &Tag::new()
                .long("--log-level")
                .placeholder("LEVEL")
                .default_value("info")
                .usage("info, debug or trace"),
            &mut self.log_level,
        )?;
        set.bind(
            &Tag::new()
                .long("--token")
                .usage("access token")
                .password()
                .prompt("Token"),
            &mut self.token,
        )?;
        set.bind(
            &Tag::new()
                .short("-y")
                .long("--yes")
                .usage("skip confirmation")
                .prompt("Start now"),
            &mut self.assume_yes,
        )?;
        Ok(())
    }
}
