use brush_parser::ast;

/// A configured external command: one program and its arguments.
///
/// Run directly, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

/// Error returned when a command string cannot be turned into a [`CommandLine`].
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ParseError(pub String);

impl CommandLine {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandLine {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Parse a shell-style command string into a single [`CommandLine`].
///
/// Uses brush-parser so quoting and escaping behave as in a shell. Only a
/// single simple command is accepted: lists, pipelines, background jobs,
/// compound commands, redirections and leading assignments are rejected,
/// since the command is executed without a shell.
pub fn parse(command: &str) -> Result<CommandLine, ParseError> {
    if command.trim().is_empty() {
        return Err(ParseError("command is empty".to_string()));
    }

    let mut parser = brush_parser::Parser::builder()
        .reader(std::io::Cursor::new(command.to_string()))
        .build();

    let program = parser
        .parse_program()
        .map_err(|e| ParseError(e.to_string()))?;

    let simple = single_simple_command(&program)?;
    command_line_from_simple(simple)
}

fn single_simple_command(program: &ast::Program) -> Result<&ast::SimpleCommand, ParseError> {
    let [complete_command] = program.complete_commands.as_slice() else {
        return Err(ParseError("expected a single command".to_string()));
    };
    // CompleteCommand = CompoundList, CompoundList.0 = Vec<CompoundListItem>
    let [item] = complete_command.0.as_slice() else {
        return Err(ParseError("command lists are not supported".to_string()));
    };
    if matches!(item.1, ast::SeparatorOperator::Async) {
        return Err(ParseError("background commands are not supported".to_string()));
    }
    let and_or = &item.0;
    if !and_or.additional.is_empty() {
        return Err(ParseError("`&&` and `||` are not supported".to_string()));
    }
    let [command] = and_or.first.seq.as_slice() else {
        return Err(ParseError("pipelines are not supported".to_string()));
    };
    match command {
        ast::Command::Simple(simple) => Ok(simple),
        _ => Err(ParseError(
            "only simple commands are supported".to_string(),
        )),
    }
}

fn command_line_from_simple(simple: &ast::SimpleCommand) -> Result<CommandLine, ParseError> {
    if simple.prefix.is_some() {
        return Err(ParseError(
            "assignments and redirections before the program are not supported".to_string(),
        ));
    }

    let program = simple
        .word_or_name
        .as_ref()
        .map(|word| strip_outer_quotes(&word.flatten()))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ParseError("missing program name".to_string()))?;

    let mut args = Vec::new();
    if let Some(suffix) = &simple.suffix {
        for item in &suffix.0 {
            match item {
                ast::CommandPrefixOrSuffixItem::Word(word) => {
                    args.push(strip_outer_quotes(&word.flatten()));
                }
                _ => {
                    return Err(ParseError(
                        "redirections and substitutions are not supported".to_string(),
                    ))
                }
            }
        }
    }

    Ok(CommandLine { program, args })
}

/// Strip matching outer quotes from a string.
///
/// brush-parser stores Word.value as raw text including quotes.
fn strip_outer_quotes(s: &str) -> String {
    let bytes = s.as_bytes();
    if bytes.len() >= 2
        && ((bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\''))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}
