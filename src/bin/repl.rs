use std::borrow::Cow;
use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Cmd, Completer, Context, Editor, EventHandler, KeyCode, KeyEvent, Modifiers};
use rustyline::{Helper, Highlighter, Hinter, Validator};
use slisp::config::{EditMode, ReplConfig};
use slisp::evaluator::special_form_identifiers;
use slisp::{Interpreter, TokenKind, tokenize};

struct SlispCompleter {
    interp: Rc<RefCell<Interpreter>>,
}

impl SlispCompleter {
    fn new(interp: Rc<RefCell<Interpreter>>) -> Self {
        SlispCompleter { interp }
    }
}

impl rustyline::completion::Completer for SlispCompleter {
    type Candidate = String;
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let tokens = tokenize(&line[..pos]);
        let candidates = match tokens.last() {
            // Only complete a symbol the cursor is still touching
            Some(token) if token.span.end == pos => match &token.kind {
                TokenKind::Atom(prefix) => {
                    let mut matches: Vec<String> = self
                        .interp
                        .borrow()
                        .env()
                        .get_identifiers()
                        .union(&special_form_identifiers())
                        .filter_map(|id| id.strip_prefix(prefix.as_str()).map(str::to_string))
                        .filter(|rest| !rest.is_empty())
                        .collect();
                    matches.sort();
                    matches
                }
                _ => vec![],
            },
            _ => vec![],
        };
        Ok((pos, candidates))
    }
}

#[derive(Completer, Helper, Highlighter, Hinter, Validator)]
struct InputValidator {
    #[rustyline(Validator)]
    validator: SlispValidator,
    #[rustyline(Highlighter)]
    highlighter: SlispHighlighter,
    #[rustyline(Completer)]
    completer: SlispCompleter,
}

struct SlispValidator;

impl Validator for SlispValidator {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let input = ctx.input();
        let mut depth = 0usize;
        let mut in_comment = false;

        for (i, c) in input.chars().enumerate() {
            if in_comment {
                in_comment = c != '\n';
                continue;
            }
            match c {
                ';' => in_comment = true,
                '(' => depth += 1,
                ')' => {
                    if depth == 0 {
                        return Ok(ValidationResult::Invalid(Some(format!(
                            "  - Unmatched ')' at position {}",
                            i
                        ))));
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }

        if depth > 0 {
            Ok(ValidationResult::Incomplete)
        } else {
            Ok(ValidationResult::Valid(None))
        }
    }
}

struct SlispHighlighter;

impl Highlighter for SlispHighlighter {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        // (byte offset in `line`, byte offset in `highlighted`) of each open paren
        let mut stack: Vec<(usize, usize)> = Vec::new();
        let mut highlighted = String::new();
        let mut in_comment = false;
        let cursor = pos.checked_sub(1);

        for (i, c) in line.char_indices() {
            if in_comment || c == ';' {
                in_comment = c != '\n';
                highlighted.push_str(&format!("\x1b[90m{}\x1b[0m", c)); // Grey for comments
                continue;
            }

            match c {
                '(' => {
                    stack.push((i, highlighted.len()));
                    highlighted.push(c);
                }
                ')' => match stack.pop() {
                    Some((opening, matching_pos)) if cursor == Some(opening) || cursor == Some(i) => {
                        highlighted.push_str(&format!("\x1b[34m{}\x1b[0m", c)); // Blue for matching parens
                        highlighted.replace_range(
                            matching_pos..=matching_pos,
                            &format!("\x1b[1;34m{}\x1b[0m", '('),
                        );
                    }
                    Some(_) => highlighted.push(c),
                    None => {
                        highlighted.push_str(&format!("\x1b[31m{}\x1b[0m", c)); // Red for unmatched closing parens
                    }
                },
                _ => highlighted.push(c),
            }
        }

        Cow::Owned(highlighted)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

fn main() -> rustyline::Result<()> {
    let config_path = ReplConfig::default_path();
    let (config, config_error) = match ReplConfig::load(&config_path) {
        Ok(config) => (config, None),
        Err(err) => (ReplConfig::default(), Some(err)),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();
    if let Some(err) = config_error {
        log::warn!("{}: {}, using defaults", config_path.display(), err);
    }

    println!("slisp REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' or press Ctrl-D to quit.");

    let interp = Rc::new(RefCell::new(Interpreter::new()));
    let h = InputValidator {
        highlighter: SlispHighlighter,
        validator: SlispValidator,
        completer: SlispCompleter::new(interp.clone()),
    };
    let edit_mode = match config.edit_mode {
        EditMode::Vi => rustyline::EditMode::Vi,
        EditMode::Emacs => rustyline::EditMode::Emacs,
    };
    let rl_config = rustyline::config::Config::builder()
        .edit_mode(edit_mode)
        .build();
    let mut rl = Editor::with_config(rl_config)?;
    rl.set_helper(Some(h));
    rl.bind_sequence(
        KeyEvent(KeyCode::Char('s'), Modifiers::CTRL),
        EventHandler::Simple(Cmd::Newline),
    );
    if config.save_history && rl.load_history(&config.history_file).is_err() {
        println!("No previous history.");
    }

    loop {
        let readline = rl.readline(&config.prompt);
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let trimmed_input = line.trim();
                if trimmed_input.is_empty() {
                    continue;
                }
                if trimmed_input.eq_ignore_ascii_case("exit") {
                    break;
                }

                let mut session = interp.borrow_mut();
                if let Err(parse_err) = session.parse(trimmed_input) {
                    if let Err(io_err) = parse_err.pretty_print("REPL", trimmed_input) {
                        log::warn!("could not render diagnostic: {}", io_err);
                    }
                    eprintln!("Error: invalid syntax");
                    continue;
                }
                match session.try_eval() {
                    Ok(result) => println!("{}", result),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        if let Some(cause) = e.source() {
                            eprintln!("  caused by: {}", cause);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C
                println!("Interrupted. Type 'exit' or Ctrl-D to quit.");
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D
                println!("\nExiting.");
                break;
            }
            Err(err) => {
                eprintln!("Readline Error: {:?}", err);
                break;
            }
        }
    }
    if config.save_history {
        rl.save_history(&config.history_file)?;
    }
    Ok(())
}
