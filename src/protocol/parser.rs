//! SPI command parser.
//!
//! Parses incoming protocol lines into structured `Command` variants that
//! the main loop dispatches on.

/// Search limits passed with the `go` command. They override the
/// configured values for that one search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GoParams {
    pub movetime: Option<u64>,
    pub depth: Option<usize>,
    pub iterations: Option<u64>,
    pub infinite: bool,
}

/// A parsed client-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Protocol handshake.
    Spi,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Forget the board and reset options.
    NewPuzzle,

    /// Set the board from its notation.
    Board { notation: String },

    /// Replay a path on the current board and report what it produces.
    Verify { path: String },

    /// Start searching the current board.
    Go(GoParams),

    /// Cancel the running search.
    Stop,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging to stderr.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let first = *tokens.first()?;

    match first {
        "spi" => Some(Command::Spi),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "newpuzzle" => Some(Command::NewPuzzle),
        "stop" => Some(Command::Stop),

        "setoption" => parse_setoption(&tokens),
        "board" => parse_single_arg(&tokens, "board <notation>").map(|notation| Command::Board { notation }),
        "verify" => parse_single_arg(&tokens, "verify <path>").map(|path| Command::Verify { path }),
        "go" => Some(parse_go(&tokens)),

        other => {
            eprintln!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        eprintln!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let (name_parts, value) = match tokens.iter().position(|&t| t == "value") {
        Some(vi) => {
            let value_parts = &tokens[vi + 1..];
            let value = (!value_parts.is_empty()).then(|| value_parts.join(" "));
            (&tokens[2..vi], value)
        }
        None => (&tokens[2..], None),
    };
    if name_parts.is_empty() {
        eprintln!("malformed setoption: empty name");
        return None;
    }

    Some(Command::SetOption {
        name: name_parts.join(" "),
        value,
    })
}

/// Parses a command taking exactly one space-free argument.
fn parse_single_arg(tokens: &[&str], usage: &str) -> Option<String> {
    if tokens.len() != 2 {
        eprintln!("malformed {}: expected '{}'", tokens[0], usage);
        return None;
    }
    Some(tokens[1].to_string())
}

/// Parses `go [movetime <ms>] [depth <n>] [iterations <n>] [infinite]`.
/// Bad values are reported and ignored.
fn parse_go(tokens: &[&str]) -> Command {
    let mut params = GoParams::default();
    let mut i = 1;

    while i < tokens.len() {
        let key = tokens[i];
        match key {
            "movetime" | "depth" | "iterations" => {
                i += 1;
                let Some(raw) = tokens.get(i) else {
                    eprintln!("missing value for {}", key);
                    break;
                };
                let parsed = raw.parse::<u64>();
                match (key, parsed) {
                    ("movetime", Ok(v)) => params.movetime = Some(v),
                    ("depth", Ok(v)) => params.depth = Some(v as usize),
                    ("iterations", Ok(v)) => params.iterations = Some(v),
                    (_, Err(_)) => eprintln!("invalid {} value: '{}'", key, raw),
                    _ => {}
                }
            }
            "infinite" => params.infinite = true,
            other => eprintln!("unknown go parameter: '{}'", other),
        }
        i += 1;
    }

    Command::Go(params)
}
