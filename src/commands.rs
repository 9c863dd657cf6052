//! Command table
//!
//! Looks up the first argument of a submitted line and runs the matching
//! handler. `<command> -h` / `<command> --help` and `help <command>` print a
//! command's help text.

use std::io::{self, Write};

use crate::core::Args;

/// What the host loop should do after a command ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub type Handler = fn(&CommandTable, &Args<'_>, &mut dyn Write) -> io::Result<Flow>;

/// A named command
#[derive(Clone)]
pub struct Command {
    pub name: &'static str,
    pub handler: Handler,
    pub help: &'static str,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: Vec<Command>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with `help`, `uname`, `echo` and `exit`
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.register(Command {
            name: "help",
            handler: cmd_help,
            help: "List available commands or show details with \x1b[1mhelp <command>\x1b[0m.",
        });
        table.register(Command {
            name: "uname",
            handler: cmd_uname,
            help: "Display system info.",
        });
        table.register(Command {
            name: "echo",
            handler: cmd_echo,
            help: "Print the arguments separated by spaces.",
        });
        table.register(Command {
            name: "exit",
            handler: cmd_exit,
            help: "Leave the console.",
        });
        table
    }

    /// Add a command. A later command with the same name replaces the earlier one.
    pub fn register(&mut self, command: Command) {
        self.commands.retain(|c| c.name != command.name);
        self.commands.push(command);
    }

    pub fn get(&self, name: &[u8]) -> Option<&Command> {
        self.commands.iter().find(|c| c.name.as_bytes() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Run the command named by the first argument.
    pub fn dispatch(&self, args: &Args<'_>, out: &mut dyn Write) -> io::Result<Flow> {
        let Some(name) = args.get(0) else {
            return Ok(Flow::Continue);
        };
        let Some(command) = self.get(name) else {
            tracing::debug!("Unknown command: {}", String::from_utf8_lossy(name));
            out.write_all(b"Unknown command!")?;
            return Ok(Flow::Continue);
        };

        if args.len() == 2 && matches!(args.get(1), Some(b"-h" | b"--help")) {
            out.write_all(command.help.as_bytes())?;
            return Ok(Flow::Continue);
        }

        tracing::info!("Running command: {}", command.name);
        (command.handler)(self, args, out)
    }
}

fn cmd_help(table: &CommandTable, args: &Args<'_>, out: &mut dyn Write) -> io::Result<Flow> {
    if args.len() == 2 {
        if let Some(command) = args.get(1).and_then(|name| table.get(name)) {
            out.write_all(command.help.as_bytes())?;
            return Ok(Flow::Continue);
        }
    }

    out.write_all(b"Available commands:\x1b[1m")?;
    for command in table.iter() {
        out.write_all(b"\t")?;
        out.write_all(command.name.as_bytes())?;
    }
    out.write_all(b"\x1b[0m\r\nTry \x1b[1m-h\x1b[0m, \x1b[1m--help\x1b[0m or ")?;
    out.write_all(b"\x1b[1mhelp <command>\x1b[0m for details.")?;
    Ok(Flow::Continue)
}

fn cmd_uname(_: &CommandTable, _: &Args<'_>, out: &mut dyn Write) -> io::Result<Flow> {
    write!(
        out,
        "{} {} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )?;
    Ok(Flow::Continue)
}

fn cmd_echo(_: &CommandTable, args: &Args<'_>, out: &mut dyn Write) -> io::Result<Flow> {
    for (i, arg) in args.iter().enumerate().skip(1) {
        if i > 1 {
            out.write_all(b" ")?;
        }
        out.write_all(arg)?;
    }
    Ok(Flow::Continue)
}

fn cmd_exit(_: &CommandTable, _: &Args<'_>, out: &mut dyn Write) -> io::Result<Flow> {
    out.write_all(b"Bye.")?;
    Ok(Flow::Exit)
}
