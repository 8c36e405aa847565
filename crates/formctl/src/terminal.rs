//! Line-prompt frontend for running dialogs from a terminal.
//!
//! Every prompt shows the current value in parentheses; an empty answer
//! keeps it. Invalid answers are reported and asked again. Running out of
//! input before the form is answered is a frontend error, so the dialog
//! exits without writing a response.

use std::fmt::Display;
use std::io::{BufRead, Write};

use formlink::forms::debug::{DebugDecision, DebugRequest};
use formlink::forms::item::{ItemDecision, ItemRequest, ItemValues, LatexCode, Placement};
use formlink::forms::options::{LatexSettings, OptionsDecision, OptionsRequest};
use formlink::forms::redo::{ItemScope, RedoDecision, RedoRequest, RedoSelection};
use formlink::{FormError, FormResult, Frontend, WireValue};

pub struct TerminalFrontend<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalFrontend<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn say(&mut self, line: impl Display) -> Result<(), FormError> {
        writeln!(self.output, "{line}").map_err(FormError::frontend)
    }

    fn ask(&mut self, prompt: &str) -> Result<String, FormError> {
        write!(self.output, "{prompt}: ").map_err(FormError::frontend)?;
        self.output.flush().map_err(FormError::frontend)?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(FormError::frontend)?;
        if read == 0 {
            return Err(FormError::Frontend(
                "input closed before the form was answered".into(),
            ));
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    /// Pick one of the offered outcomes; the first one is the default.
    fn action(&mut self, offered: &[FormResult]) -> Result<FormResult, FormError> {
        let choices = offered
            .iter()
            .map(|result| result.as_str())
            .collect::<Vec<_>>()
            .join("/");
        let default = offered[0];
        loop {
            let answer = self.ask(&format!("action [{choices}] ({default})"))?;
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(default);
            }
            match offered.iter().find(|result| result.as_str() == answer) {
                Some(result) => return Ok(*result),
                None => self.say(format_args!("'{answer}' is not offered here"))?,
            }
        }
    }

    fn pick<T: WireValue>(&mut self, label: &str, current: T) -> Result<T, FormError> {
        let choices = T::ALL
            .iter()
            .map(|value| value.as_str())
            .collect::<Vec<_>>()
            .join("/");
        loop {
            let answer = self.ask(&format!("{label} [{choices}] ({})", current.as_str()))?;
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(current);
            }
            match T::from_wire(answer) {
                Some(value) => return Ok(value),
                None => self.say(format_args!("'{answer}' is not a valid {}", T::KIND))?,
            }
        }
    }

    fn text(&mut self, label: &str, current: &str) -> Result<String, FormError> {
        let answer = self.ask(&format!("{label} ({current})"))?;
        if answer.is_empty() {
            Ok(current.to_string())
        } else {
            Ok(answer)
        }
    }

    fn flag(&mut self, label: &str, current: bool) -> Result<bool, FormError> {
        let shown = if current { "y" } else { "n" };
        loop {
            let answer = self.ask(&format!("{label} [y/n] ({shown})"))?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(current),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                other => self.say(format_args!("'{other}' is neither yes nor no"))?,
            }
        }
    }

    fn settings(&mut self, start: &LatexSettings) -> Result<LatexSettings, FormError> {
        Ok(LatexSettings {
            command_latex: self.pick("LaTeX command", start.command_latex)?,
            path_latex: self.text("LaTeX path", &start.path_latex)?,
            command_latex_options: self.text("LaTeX options", &start.command_latex_options)?,
            command_gs: self.text("Ghostscript command", &start.command_gs)?,
            warning_ai_not_saved: self.flag(
                "warn when the document is not saved",
                start.warning_ai_not_saved,
            )?,
            warning_boundary_boxes: self.flag(
                "warn about distorted boundary boxes",
                start.warning_boundary_boxes,
            )?,
        })
    }
}

impl<R: BufRead, W: Write> Frontend for TerminalFrontend<R, W> {
    fn item(&mut self, request: &ItemRequest) -> Result<ItemDecision, FormError> {
        self.say(format_args!(
            "item: boundary box {}, LaTeX file {}",
            request.boundary_box_state,
            if request.latex_exists { "present" } else { "absent" }
        ))?;
        let mut offered = vec![FormResult::Ok, FormResult::Cancel];
        if request.can_redo_boundary_box() {
            offered.push(FormResult::RedoBoundaryBox);
        }
        if request.can_redo_latex() {
            offered.push(FormResult::RedoLatex);
        }
        match self.action(&offered)? {
            FormResult::Cancel => return Ok(ItemDecision::Cancel),
            FormResult::RedoBoundaryBox => return Ok(ItemDecision::RedoBoundaryBox),
            FormResult::RedoLatex => return Ok(ItemDecision::RedoLatex),
            _ => {}
        }

        let current = &request.values;
        let placement = Placement::new(
            self.pick("horizontal alignment", current.placement.horizontal)?,
            self.pick("vertical alignment", current.placement.vertical)?,
        );
        let placed_option = self.pick("placement", current.placed_option)?;
        let code = self.text("LaTeX code", &current.latex.code)?;
        let latex = if code == current.latex.code {
            current.latex.clone()
        } else {
            let end = code.chars().count();
            LatexCode::new(code, end)
        };
        Ok(ItemDecision::Ok(ItemValues {
            placement,
            placed_option,
            latex,
        }))
    }

    fn redo(&mut self, request: &RedoRequest) -> Result<RedoDecision, FormError> {
        self.say(format_args!(
            "redo: {} items, {} selected",
            request.n_all_items, request.n_selected_items
        ))?;
        if self.action(&[FormResult::Ok, FormResult::Cancel])? == FormResult::Cancel {
            return Ok(RedoDecision::Cancel);
        }
        let defaults = RedoSelection::default();
        let redo_latex = self.flag("recompile LaTeX", defaults.redo_latex)?;
        let redo_boundary =
            redo_latex || self.flag("redo boundary boxes", defaults.redo_boundary)?;
        let scope = if request.n_selected_items > 0 {
            self.pick("items", defaults.scope)?
        } else {
            ItemScope::All
        };
        Ok(RedoDecision::Ok(RedoSelection {
            redo_latex,
            redo_boundary,
            scope,
        }))
    }

    fn debug(&mut self, request: &DebugRequest) -> Result<DebugDecision, FormError> {
        self.say(format_args!(
            "LaTeX compilation failed during {}; log file: {}",
            request.creation_type,
            request.log_file.display()
        ))?;
        if !request.can_accept() {
            self.ask("press enter to continue")?;
            return Ok(DebugDecision::Cancel);
        }
        match self.action(&[FormResult::Ok, FormResult::Cancel])? {
            FormResult::Cancel => Ok(DebugDecision::Cancel),
            _ => Ok(DebugDecision::Ok {
                create_debug_folder: self.flag("create debug folder", false)?,
            }),
        }
    }

    fn options(&mut self, request: &OptionsRequest) -> Result<OptionsDecision, FormError> {
        self.say(format_args!(
            "version {} ({}), document header: {}",
            request.version,
            request.git_sha,
            request.header.to_wire()
        ))?;
        let mut offered = vec![FormResult::Ok, FormResult::Cancel];
        if request.header.can_create() {
            offered.push(FormResult::CreateDefaultHeader);
        }
        let action = self.action(&offered)?;
        if action == FormResult::Cancel {
            return Ok(OptionsDecision::Cancel);
        }
        let start = if self.flag("reset to defaults", false)? {
            &request.defaults
        } else {
            &request.current
        };
        let start = start.clone();
        let settings = self.settings(&start)?;
        if action == FormResult::CreateDefaultHeader {
            Ok(OptionsDecision::CreateDefaultHeader(settings))
        } else {
            Ok(OptionsDecision::Save(settings))
        }
    }
}
