use std::collections::HashMap;

/// Value stored for a named flag: either a bare boolean or the string that
/// followed the flag on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    Str(String),
}

/// Recognized one-letter aliases for long flags. Any other clustered letter
/// becomes a boolean flag under its own name.
const SHORT_ALIASES: &[(char, &str)] = &[('h', "help")];

/// A parsed command line: ordered positionals plus a flag-name to value map.
///
/// Repeated flags keep the last occurrence. The parser itself never errors;
/// unknown flags are simply recorded and ignored by operations that don't
/// consult them.
#[derive(Debug, Default)]
pub struct ParsedArgs {
    positionals: Vec<String>,
    flags: HashMap<String, FlagValue>,
}

impl ParsedArgs {
    /// Parses the raw argument vector (excluding the program name).
    ///
    /// Rules:
    /// - a token not starting with `-` is a positional
    /// - a bare `--` makes every subsequent token a positional
    /// - `--name=value` splits at the first `=`
    /// - `--name` consumes the next token as its value when that token exists
    ///   and does not start with `-`, otherwise stores boolean `true`
    /// - `-abc` is a cluster of one-letter boolean flags (`-h` aliases `help`)
    pub fn parse<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let mut positionals = Vec::new();
        let mut flags: HashMap<String, FlagValue> = HashMap::new();
        let mut only_positionals = false;

        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];

            if only_positionals {
                positionals.push(token.clone());
            } else if token == "--" {
                only_positionals = true;
            } else if let Some(rest) = token.strip_prefix("--") {
                if let Some((name, value)) = rest.split_once('=') {
                    flags.insert(name.to_string(), FlagValue::Str(value.to_string()));
                } else if let Some(next) = tokens.get(i + 1).filter(|t| !t.starts_with('-')) {
                    flags.insert(rest.to_string(), FlagValue::Str(next.clone()));
                    i += 1;
                } else {
                    flags.insert(rest.to_string(), FlagValue::Bool(true));
                }
            } else if token.starts_with('-') && token.len() > 1 {
                for ch in token.chars().skip(1) {
                    let name = SHORT_ALIASES
                        .iter()
                        .find(|(short, _)| *short == ch)
                        .map_or_else(|| ch.to_string(), |(_, long)| (*long).to_string());
                    flags.insert(name, FlagValue::Bool(true));
                }
            } else {
                positionals.push(token.clone());
            }

            i += 1;
        }

        Self { positionals, flags }
    }

    /// All positionals in order, command name included.
    #[must_use]
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// The command name: the first positional.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        self.positionals.first().map(String::as_str)
    }

    /// The `index`-th positional after the command name.
    #[must_use]
    pub fn operand(&self, index: usize) -> Option<&str> {
        self.positionals.get(index + 1).map(String::as_str)
    }

    /// Boolean flag accessor: stored boolean if present, string `"true"` /
    /// `"false"` coerced, anything else falls back to `default`.
    #[must_use]
    pub fn flag_bool(&self, name: &str, default: bool) -> bool {
        match self.flags.get(name) {
            Some(FlagValue::Bool(value)) => *value,
            Some(FlagValue::Str(value)) => match value.as_str() {
                "true" => true,
                "false" => false,
                _ => default,
            },
            None => default,
        }
    }

    /// String flag accessor. A flag stored as a boolean counts as absent.
    #[must_use]
    pub fn flag_str(&self, name: &str) -> Option<&str> {
        match self.flags.get(name) {
            Some(FlagValue::Str(value)) => Some(value.as_str()),
            _ => None,
        }
    }
}
