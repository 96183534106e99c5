//! Subcommand abbreviation.
//!
//! A token abbreviates a command name when both start with the same character
//! and the token is a subsequence of the name, so `dp` selects `deploy` and
//! `rep` selects `replicas`. [`AbbreviationExpander`] applies this to a clap
//! command tree by rewriting argv before clap sees it.

use std::ffi::OsString;

use clap::Command as ClapCommand;

use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    Resolved(&'a str),
    Ambiguous(Vec<&'a str>),
    NotFound,
}

pub fn is_abbrev(token: &str, name: &str) -> bool {
    let mut token_chars = token.chars();
    let mut name_chars = name.chars();
    match (token_chars.next(), name_chars.next()) {
        (Some(a), Some(b)) if a == b => {}
        _ => return false,
    }
    token_chars.all(|c| name_chars.any(|n| n == c))
}

/// Resolve `token` against `names`. An exact match wins outright; otherwise
/// every name the token abbreviates is a candidate.
pub fn resolve<'a, I>(token: &str, names: I) -> Resolution<'a>
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&'a str> = names.into_iter().collect();
    if let Some(exact) = names.iter().copied().find(|n| *n == token) {
        return Resolution::Resolved(exact);
    }

    let mut matches: Vec<&'a str> = names
        .into_iter()
        .filter(|n| is_abbrev(token, n))
        .collect();
    matches.sort_unstable();
    matches.dedup();

    match matches.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Resolved(matches[0]),
        _ => Resolution::Ambiguous(matches),
    }
}

/// Rewrites abbreviated subcommand tokens in argv to their full names.
pub struct AbbreviationExpander {
    root: ClapCommand,
}

impl AbbreviationExpander {
    pub fn new(mut root: ClapCommand) -> Self {
        root.build();
        Self { root }
    }

    pub fn expand<I, T>(&self, args: I) -> Result<Vec<OsString>, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::into);
        let mut out: Vec<OsString> = Vec::new();
        // argv[0]
        if let Some(bin) = args.next() {
            out.push(bin);
        }

        // Commands from the root down to the one currently being filled in.
        let mut path: Vec<&ClapCommand> = vec![&self.root];
        let mut passthrough = false;

        while let Some(arg) = args.next() {
            if passthrough {
                out.push(arg);
                continue;
            }
            let Some(text) = arg.to_str().map(str::to_string) else {
                out.push(arg);
                continue;
            };

            if text == "--" {
                passthrough = true;
                out.push(arg);
                continue;
            }

            if text.starts_with('-') && text.len() > 1 {
                let needs_value = option_takes_separate_value(&path, &text);
                out.push(arg);
                if needs_value {
                    if let Some(value) = args.next() {
                        out.push(value);
                    }
                }
                continue;
            }

            let current = path[path.len() - 1];
            if !current.has_subcommands() {
                out.push(arg);
                continue;
            }

            match resolve_subcommand(current, &text)? {
                Some(sub) => {
                    out.push(OsString::from(sub.get_name()));
                    path.push(sub);
                }
                None => {
                    // Let clap produce its own unknown-subcommand error.
                    out.push(arg);
                    passthrough = true;
                }
            }
        }

        Ok(out)
    }
}

fn resolve_subcommand<'c>(
    parent: &'c ClapCommand,
    token: &str,
) -> Result<Option<&'c ClapCommand>, CliError> {
    if let Some(sub) = parent
        .get_subcommands()
        .find(|s| s.get_name() == token || s.get_all_aliases().any(|a| a == token))
    {
        return Ok(Some(sub));
    }

    match resolve(token, parent.get_subcommands().map(ClapCommand::get_name)) {
        Resolution::Resolved(name) => Ok(parent.find_subcommand(name)),
        Resolution::NotFound => Ok(None),
        Resolution::Ambiguous(candidates) => Err(CliError::Ambiguous {
            token: token.to_string(),
            candidates: candidates.into_iter().map(str::to_string).collect(),
        }),
    }
}

/// Whether `flag` is an option whose value is the next argv entry. Options
/// visible at this depth are the current command's plus any global ones
/// declared higher up.
fn option_takes_separate_value(path: &[&ClapCommand], flag: &str) -> bool {
    let lookup = |matches: &dyn Fn(&clap::Arg) -> bool| {
        path.iter().rev().enumerate().find_map(|(depth, cmd)| {
            cmd.get_arguments()
                .filter(|a| depth == 0 || a.is_global_set())
                .find(|a| matches(a))
                .map(|a| a.get_action().takes_values())
        })
    };

    if let Some(long) = flag.strip_prefix("--") {
        if long.contains('=') {
            return false;
        }
        return lookup(&|a: &clap::Arg| {
            a.get_long() == Some(long)
                || a.get_all_aliases()
                    .is_some_and(|aliases| aliases.contains(&long))
        })
        .unwrap_or(false);
    }

    // Short cluster like `-v` or `-ofile`; only a bare single short option
    // consumes the next entry.
    let short: Vec<char> = flag.chars().skip(1).collect();
    if short.len() != 1 {
        return false;
    }
    lookup(&|a: &clap::Arg| a.get_short() == Some(short[0])).unwrap_or(false)
}
