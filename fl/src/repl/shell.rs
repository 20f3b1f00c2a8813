//! Interactive shell session

use std::str::FromStr;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::render;
use crate::app::{App, Mode, Outcome};
use crate::closet::RenameState;
use crate::domain::{OutfitId, PreferenceField};

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Quit,
    Show,
    Set { field: PreferenceField, value: String },
    Style(Option<String>),
    Generate,
    Change(String),
    /// 1-based, as displayed
    Pick(usize),
    Save,
    Closet,
    Create,
    Rename(OutfitId),
    Delete(OutfitId),
    Url(String),
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let cmd = parts.next().unwrap_or("").to_lowercase();
        let rest: Vec<&str> = parts.collect();

        let one_arg = |what: &str| -> Result<String, String> {
            match rest.as_slice() {
                [arg] => Ok(arg.to_string()),
                _ => Err(format!("Usage: {} <{}>", cmd, what)),
            }
        };
        let id_arg = || -> Result<OutfitId, String> {
            one_arg("id")?
                .parse()
                .map_err(|_| format!("Not an outfit id: {}", rest.join(" ")))
        };

        match cmd.as_str() {
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            "show" | "ls" => Ok(Self::Show),
            "set" => match rest.as_slice() {
                [field, value] => Ok(Self::Set {
                    field: field.parse().map_err(|e| format!("{}", e))?,
                    value: value.to_string(),
                }),
                _ => Err("Usage: set <gender|season|occasion> <value>".to_string()),
            },
            "gender" | "season" | "occasion" => Ok(Self::Set {
                field: cmd.parse().map_err(|e| format!("{}", e))?,
                value: one_arg("value")?,
            }),
            "style" => match rest.as_slice() {
                [] | ["none"] => Ok(Self::Style(None)),
                words => Ok(Self::Style(Some(words.join(" ")))),
            },
            "generate" | "gen" | "g" => Ok(Self::Generate),
            "change" | "c" => Ok(Self::Change(one_arg("slot")?)),
            "pick" | "p" => {
                let n: usize = one_arg("n")?.parse().map_err(|_| "Usage: pick <n>".to_string())?;
                if n == 0 {
                    return Err("Alternatives are numbered from 1".to_string());
                }
                Ok(Self::Pick(n))
            }
            "save" => Ok(Self::Save),
            "closet" => Ok(Self::Closet),
            "create" | "back" => Ok(Self::Create),
            "rename" => Ok(Self::Rename(id_arg()?)),
            "delete" | "rm" => Ok(Self::Delete(id_arg()?)),
            "url" => Ok(Self::Url(one_arg("slot")?)),
            other => Err(format!("Unknown command: {}", other)),
        }
    }
}

/// What the loop should do after a command
enum Flow {
    Continue,
    Quit,
}

/// Interactive session over an [`App`]
pub struct Shell {
    app: App,
}

impl Shell {
    pub fn new(app: App) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Run the read-eval-print loop until `quit` or Ctrl+D
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();
        self.print_view();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&self.prompt());

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if !input.is_empty() {
                        let _ = rl.add_history_entry(input);
                    }

                    match self.handle_line(input).await {
                        Flow::Continue => continue,
                        Flow::Quit => break,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C backs out of a modal, otherwise just a new prompt
                    println!("^C");
                    self.app.cancel_save();
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        // Leaving with the rename editor open keeps the typed name
        if let Err(e) = self.app.confirm_rename() {
            println!("{} {}", "✗".red(), e);
        }

        println!("Goodbye!");
        Ok(())
    }

    fn prompt(&self) -> String {
        if self.app.closet().is_prompting() {
            format!("{} ", "name (optional)>".bright_magenta())
        } else if let RenameState::Editing { buffer, .. } = self.app.closet().rename_state() {
            format!("{} ", format!("rename [{}]>", buffer).bright_magenta())
        } else {
            format!("{} ", format!("{}>", self.app.mode()).bright_green())
        }
    }

    async fn handle_line(&mut self, input: &str) -> Flow {
        // Modal input first: the naming prompt, then the rename editor
        if self.app.closet().is_prompting() {
            self.handle_name_input(input);
            return Flow::Continue;
        }
        if self.app.closet().editing_id().is_some() {
            self.handle_rename_input(input);
            return Flow::Continue;
        }

        if input.is_empty() {
            return Flow::Continue;
        }

        match input.parse::<ShellCommand>() {
            Ok(cmd) => self.dispatch(cmd).await,
            Err(msg) => {
                println!("{} {}", "?".yellow(), msg);
                println!("Type {} for available commands", "help".yellow());
                Flow::Continue
            }
        }
    }

    fn handle_name_input(&mut self, input: &str) {
        if input.eq_ignore_ascii_case("cancel") {
            self.app.cancel_save();
            println!("{}", "Save cancelled.".dimmed());
            return;
        }

        let name = input.strip_prefix("name ").map(str::trim).unwrap_or(input);
        match self.app.confirm_save(name) {
            Ok(id) => {
                let name = self.app.closet().get(id).map(|o| o.display_name()).unwrap_or_default();
                println!("{} Saved to closet: {}", "✓".green(), name.cyan());
            }
            Err(e) => println!("{} {}", "✗".red(), e),
        }
    }

    fn handle_rename_input(&mut self, input: &str) {
        // An empty line keeps the current buffer, like leaving the field
        if !input.is_empty() {
            self.app.set_rename_buffer(input);
        }
        match self.app.confirm_rename() {
            Ok(()) => println!("{} Renamed.", "✓".green()),
            Err(e) => println!("{} {}", "✗".red(), e),
        }
    }

    async fn dispatch(&mut self, cmd: ShellCommand) -> Flow {
        match cmd {
            ShellCommand::Help => self.print_help(),
            ShellCommand::Quit => return Flow::Quit,
            ShellCommand::Show => self.print_view(),
            ShellCommand::Set { field, value } => match self.app.set_preference(field, &value) {
                Ok(()) => println!("{}", render::preferences_line(&self.app)),
                Err(e) => println!("{} {}", "✗".red(), e),
            },
            ShellCommand::Style(style) => {
                self.app.set_style(style);
                println!("{}", render::preferences_line(&self.app));
            }
            ShellCommand::Generate => {
                self.app.set_mode(Mode::Generate);
                println!("{}", "Generating...".dimmed());
                let outcome = self.app.generate().await;
                self.report(outcome);
            }
            ShellCommand::Change(slot) => {
                self.app.set_mode(Mode::Generate);
                match self.app.request_alternatives(&slot).await {
                    Ok(outcome) => self.report(outcome),
                    Err(e) => println!("{} {}", "✗".red(), e),
                }
            }
            ShellCommand::Pick(n) => match self.app.choose_alternative(n - 1) {
                Ok(slot) => {
                    println!("{} Replaced {}", "✓".green(), slot.bright_green());
                    self.print_view();
                }
                Err(e) => println!("{} {}", "✗".red(), e),
            },
            ShellCommand::Save => match self.app.request_save() {
                Ok(()) => println!(
                    "Name your outfit ({} or Enter for the default, {} to abort)",
                    "name <text>".yellow(),
                    "cancel".yellow()
                ),
                Err(e) => println!("{} {}", "✗".red(), e),
            },
            ShellCommand::Closet => {
                self.app.set_mode(Mode::Closet);
                self.print_view();
            }
            ShellCommand::Create => {
                self.app.set_mode(Mode::Generate);
                self.print_view();
            }
            ShellCommand::Rename(id) => {
                if !self.app.begin_rename(id) {
                    println!("{} No saved outfit with id {}", "✗".red(), id);
                }
            }
            ShellCommand::Delete(id) => match self.app.delete(id) {
                Ok(true) => println!("{} Deleted {}", "✓".green(), id),
                Ok(false) => println!("No saved outfit with id {}", id),
                Err(e) => println!("{} {}", "✗".red(), e),
            },
            ShellCommand::Url(slot) => match self.app.session().outfit().and_then(|o| o.get(&slot)) {
                Some(item) => println!("{}", self.app.client().image_url(&item.image)),
                None => println!("{} No '{}' in the current outfit", "✗".red(), slot),
            },
        }
        Flow::Continue
    }

    fn report(&self, outcome: Outcome) {
        match outcome {
            Outcome::Updated => self.print_view(),
            Outcome::Busy => println!("{}", "Already loading, please wait.".dimmed()),
            Outcome::Stale => println!("{}", "A newer request replaced that one.".dimmed()),
            Outcome::Notice(notice) => println!("{} {}", "!".bright_red().bold(), notice),
        }
    }

    fn print_view(&self) {
        println!();
        for line in render::view_lines(&self.app) {
            println!("{}", line);
        }
        println!();
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "FashionLabs outfit shell".bright_cyan().bold());
        println!("Type {} for help, {} to quit", "help".yellow(), "quit".yellow());
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Create:".bright_cyan());
        println!("  {:24} Set a preference", "set <field> <value>".yellow());
        println!("  {:24} Shortcut for set", "gender|season|occasion <v>".yellow());
        println!("  {:24} Style hint (or 'none')", "style <text>".yellow());
        println!("  {:24} Generate an outfit", "generate".yellow());
        println!("  {:24} Show alternatives for a slot", "change <slot>".yellow());
        println!("  {:24} Use alternative n", "pick <n>".yellow());
        println!("  {:24} Image URL for a slot", "url <slot>".yellow());
        println!("  {:24} Save current outfit to closet", "save".yellow());
        println!();
        println!("{}", "Closet:".bright_cyan());
        println!("  {:24} Show the closet", "closet".yellow());
        println!("  {:24} Rename a saved outfit", "rename <id>".yellow());
        println!("  {:24} Delete a saved outfit", "delete <id>".yellow());
        println!("  {:24} Back to the generator", "create".yellow());
        println!();
        println!("  {:24} Redraw the current view", "show".yellow());
        println!("  {:24} Exit", "quit".yellow());
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!("generate".parse(), Ok(ShellCommand::Generate));
        assert_eq!("  G ".parse(), Ok(ShellCommand::Generate));
        assert_eq!("change top".parse(), Ok(ShellCommand::Change("top".to_string())));
        assert_eq!("pick 3".parse(), Ok(ShellCommand::Pick(3)));
        assert_eq!("closet".parse(), Ok(ShellCommand::Closet));
        assert_eq!("delete 1700000000000".parse(), Ok(ShellCommand::Delete(1_700_000_000_000)));
    }

    #[test]
    fn test_parse_preferences() {
        assert_eq!(
            "set season summer".parse(),
            Ok(ShellCommand::Set {
                field: PreferenceField::Season,
                value: "summer".to_string()
            })
        );
        assert_eq!(
            "occasion formal".parse(),
            Ok(ShellCommand::Set {
                field: PreferenceField::Occasion,
                value: "formal".to_string()
            })
        );
        assert!("set colour red".parse::<ShellCommand>().is_err());
    }

    #[test]
    fn test_parse_style() {
        assert_eq!(
            "style smart casual".parse(),
            Ok(ShellCommand::Style(Some("smart casual".to_string())))
        );
        assert_eq!("style none".parse(), Ok(ShellCommand::Style(None)));
        assert_eq!("style".parse(), Ok(ShellCommand::Style(None)));
    }

    #[test]
    fn test_parse_errors() {
        assert!("pick 0".parse::<ShellCommand>().is_err());
        assert!("pick".parse::<ShellCommand>().is_err());
        assert!("rename abc".parse::<ShellCommand>().is_err());
        assert!("change".parse::<ShellCommand>().is_err());
        assert!("dance".parse::<ShellCommand>().is_err());
    }
}
