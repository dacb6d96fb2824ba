//! Interactive patient prompt using rustyline
//!
//! Collects age, gender and three symptoms line by line. An empty age or
//! Ctrl-D ends the session.

use crate::platform::PatientInput;
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Readline-backed prompt for patient attributes
pub struct PatientPrompt {
    editor: DefaultEditor,
}

impl PatientPrompt {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }

    /// Read one patient; `Ok(None)` when the user is done
    pub fn read_patient(&mut self) -> Result<Option<PatientInput>> {
        let editor = &mut self.editor;
        collect_patient(|prompt| match editor.readline(prompt) {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
            Err(err) => Err(anyhow::anyhow!("Readline error: {}", err)),
        })
    }
}

/// Parse an age entry: a non-negative integer
pub fn parse_age(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok().filter(|age| *age >= 0)
}

/// Drive the five questions through `read`, re-asking for age until it parses
pub fn collect_patient<F>(mut read: F) -> Result<Option<PatientInput>>
where
    F: FnMut(&str) -> Result<Option<String>>,
{
    let age = loop {
        let Some(line) = read("Enter patient's age: ")? else {
            return Ok(None);
        };
        if line.trim().is_empty() {
            return Ok(None);
        }
        match parse_age(&line) {
            Some(age) => break age,
            None => eprintln!("Age must be a whole number, got '{}'", line.trim()),
        }
    };

    let mut fields = Vec::with_capacity(4);
    for question in [
        "Enter patient's gender (M/F): ",
        "Enter first symptom: ",
        "Enter second symptom: ",
        "Enter third symptom: ",
    ] {
        match read(question)? {
            Some(line) => fields.push(line.trim().to_string()),
            None => return Ok(None),
        }
    }

    let [gender, symptom1, symptom2, symptom3]: [String; 4] = fields
        .try_into()
        .map_err(|_| anyhow::anyhow!("Incomplete patient entry"))?;

    Ok(Some(PatientInput::new(age, gender, symptom1, symptom2, symptom3)))
}
