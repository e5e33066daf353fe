#[cfg(test)]
pub mod test {
    use std::collections::VecDeque;
    use std::io;

    use serde::Deserialize;

    use crate::error::DecodeError;
    use crate::kind::{Kind, Scalar};
    use crate::prompt::{Prompter, parse_yes_no};
    use crate::tag::Tag;
    use crate::value::{Decode, FieldValue};

    /// `-p/--port`, placeholder `PORT`, default `$PORT+1`, required.
    pub fn port_tag() -> Tag {
        Tag::new()
            .short("-p")
            .long("--port")
            .placeholder("PORT")
            .default_value("$PORT+1")
            .usage("listen port")
            .required()
    }

    // -- Self-decoding custom kind ----------------------------------------------

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub enum Level {
        #[default]
        Info,
        Warn,
        Error,
    }

    impl Decode for Level {
        fn decode(&mut self, raw: &str) -> Result<(), DecodeError> {
            *self = match raw {
                "info" => Level::Info,
                "warn" => Level::Warn,
                "error" => Level::Error,
                other => return Err(format!("unknown level '{other}'").into()),
            };
            Ok(())
        }
    }

    crate::decode_field!(Level);

    // -- Custom kind with no decoder --------------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct Opaque(pub u8);

    impl FieldValue for Opaque {
        fn kind() -> Kind {
            Kind::Custom("Opaque")
        }

        fn field_kind(&self) -> Kind {
            Kind::Custom("Opaque")
        }

        fn is_zero(&self) -> bool {
            self.0 == 0
        }

        fn store(&mut self, _scalar: Scalar) -> bool {
            false
        }
    }

    // -- JSON-decoded struct for custom parsers ---------------------------------

    #[derive(Debug, Default, PartialEq, Deserialize)]
    pub struct Endpoint {
        pub host: String,
        pub port: u16,
    }

    // -- Prompters ---------------------------------------------------------------

    /// Answers prompts from a script and records what was asked, as
    /// `method:prompt`.
    #[derive(Debug, Default)]
    pub struct ScriptedPrompter {
        answers: VecDeque<String>,
        asked: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn new<I, S>(answers: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                answers: answers.into_iter().map(Into::into).collect(),
                asked: Vec::new(),
            }
        }

        pub fn asked(&self) -> &[String] {
            &self.asked
        }

        fn next(&mut self, entry: String) -> io::Result<String> {
            self.asked.push(entry);
            self.answers
                .pop_front()
                .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
        }
    }

    impl Prompter for ScriptedPrompter {
        fn read_line(&mut self, prompt: &str, required: bool) -> io::Result<String> {
            let method = if required { "required" } else { "line" };
            self.next(format!("{method}:{prompt}"))
        }

        fn read_line_with_default(&mut self, prompt: &str, default: &str) -> io::Result<String> {
            let answer = self.next(format!("default({default}):{prompt}"))?;
            if answer.is_empty() {
                Ok(default.to_string())
            } else {
                Ok(answer)
            }
        }

        fn read_password(&mut self, prompt: &str) -> io::Result<String> {
            self.next(format!("password:{prompt}"))
        }

        fn read_yes_no(&mut self, prompt: &str) -> io::Result<bool> {
            let answer = self.next(format!("yes_no:{prompt}"))?;
            parse_yes_no(&answer).ok_or_else(|| io::Error::from(io::ErrorKind::InvalidData))
        }
    }

    /// Fails every read with the given error kind.
    pub struct FailingPrompter(pub io::ErrorKind);

    impl Prompter for FailingPrompter {
        fn read_line(&mut self, _prompt: &str, _required: bool) -> io::Result<String> {
            Err(self.0.into())
        }

        fn read_line_with_default(&mut self, _prompt: &str, _default: &str) -> io::Result<String> {
            Err(self.0.into())
        }

        fn read_password(&mut self, _prompt: &str) -> io::Result<String> {
            Err(self.0.into())
        }

        fn read_yes_no(&mut self, _prompt: &str) -> io::Result<bool> {
            Err(self.0.into())
        }
    }

    #[test]
    fn scripted_prompter_records_questions() {
        let mut prompter = ScriptedPrompter::new(["", "no"]);
        assert_eq!(
            prompter.read_line_with_default("Port: ", "80").unwrap(),
            "80"
        );
        assert!(!prompter.read_yes_no("Force: ").unwrap());
        assert!(prompter.read_line("Name: ", false).is_err());
        assert_eq!(
            prompter.asked(),
            ["default(80):Port: ", "yes_no:Force: ", "line:Name: "]
        );
    }
}
