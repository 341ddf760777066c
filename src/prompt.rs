use anyhow::{bail, Result};
use dialoguer::{Confirm, Input};

use crate::model::space::Space;

pub fn space_menu(spaces: &[Space]) -> String {
    spaces
        .iter()
        .enumerate()
        .map(|(i, space)| format!("[{}] {}", i + 1, space.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolve a menu answer: a 1-based number, or a space name (case-insensitive).
pub fn parse_choice<'a>(answer: &str, spaces: &'a [Space]) -> Result<&'a Space> {
    let answer = answer.trim();
    if let Ok(n) = answer.parse::<usize>() {
        if let Some(space) = n.checked_sub(1).and_then(|i| spaces.get(i)) {
            return Ok(space);
        }
    } else if let Some(space) = spaces
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(answer))
    {
        return Ok(space);
    }
    bail!("Not a valid choice: {answer}")
}

pub fn choose_destination(spaces: &[Space]) -> Result<&Space> {
    if spaces.is_empty() {
        bail!("No spaces found in this organization");
    }
    println!("{}", space_menu(spaces));
    let answer: String = Input::new()
        .with_prompt("To which space do you want to move all of your work items?")
        .interact_text()?;
    parse_choice(&answer, spaces)
}

pub fn confirm(destination: &Space) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(format!(
            "Are you sure you want to move all work items to space {}?",
            destination.name
        ))
        .default(false)
        .interact()?;
    Ok(confirmed)
}
