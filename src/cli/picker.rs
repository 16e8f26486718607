//! Interactive product picker.
//!
//! Used by `hvac quote` when no `--product` is given and stdin is a terminal.
//! Prompts read from any `BufRead`.

use std::io::{self, BufRead, Write};

use crate::data::CATALOG;
use crate::domain::{ProductCatalogEntry, Selections};
use crate::error::AppError;

/// A product with every attribute chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct Pick {
    pub product: &'static ProductCatalogEntry,
    pub selections: Selections,
}

/// Prompt on stdin/stdout.
pub fn prompt_for_product() -> Result<Pick, AppError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    pick_product(&mut input, &mut output)
}

/// Prompt for a product by number or name, then for each of its attributes.
///
/// Behavior:
/// - accept either a number (from the list) or a product name
/// - an empty attribute answer keeps the first option
/// - `q` cancels
pub fn pick_product<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Pick, AppError> {
    say(out, &format!("Catalog has {} product(s):", CATALOG.len()))?;
    for (idx, p) in CATALOG.iter().enumerate() {
        say(out, &format!("{:>3}) {} ({})", idx + 1, p.name, p.unit.label()))?;
    }

    let product = loop {
        let answer = ask(
            input,
            out,
            &format!("Select a product by number (1-{}) or name (q to quit): ", CATALOG.len()),
        )?;

        if let Ok(choice) = answer.parse::<usize>() {
            if (1..=CATALOG.len()).contains(&choice) {
                break &CATALOG[choice - 1];
            }
            say(out, &format!("Invalid choice: {choice}. Enter a number between 1 and {}.", CATALOG.len()))?;
            continue;
        }

        match crate::data::find_product(&answer) {
            Some(p) => break p,
            None => say(out, &format!("Unknown product: {answer}"))?,
        }
    };

    let mut selections = Selections::new();
    for attribute in product.attributes {
        let value = loop {
            let options: Vec<String> = attribute
                .options
                .iter()
                .enumerate()
                .map(|(i, o)| format!("{}) {o}", i + 1))
                .collect();
            let answer = ask(
                input,
                out,
                &format!("{} [{}] (enter for {}): ", attribute.name, options.join("  "), attribute.options[0]),
            )?;

            if answer.is_empty() {
                break attribute.options[0];
            }
            if let Ok(choice) = answer.parse::<usize>() {
                if let Some(v) = choice.checked_sub(1).and_then(|i| attribute.options.get(i)) {
                    break *v;
                }
            }
            if let Some(v) = attribute.options.iter().find(|o| **o == answer) {
                break *v;
            }
            say(out, &format!("Invalid {}: {answer}", attribute.name))?;
        };
        selections.insert(attribute.name.to_string(), value.to_string());
    }

    Ok(Pick { product, selections })
}

/// Parse `NAME=VALUE` pairs from `--option` flags.
pub fn parse_selections(raw: &[String]) -> Result<Selections, AppError> {
    raw.iter()
        .map(|pair| {
            let (name, value) = pair.split_once('=').ok_or_else(|| {
                AppError::validation(format!("Expected NAME=VALUE for --option, got '{pair}'."))
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::validation(format!("Missing attribute name in '{pair}'.")));
            }
            Ok((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<String, AppError> {
    write!(out, "{prompt}").map_err(|e| AppError::io(format!("Failed to write prompt: {e}")))?;
    out.flush()
        .map_err(|e| AppError::io(format!("Failed to write prompt: {e}")))?;

    let mut line = String::new();
    let bytes = input
        .read_line(&mut line)
        .map_err(|e| AppError::io(format!("Failed to read input: {e}")))?;

    if bytes == 0 {
        return Err(AppError::validation(
            "No input received. Provide a product with `hvac quote --product <name>`.",
        ));
    }

    let answer = line.trim();
    if answer.eq_ignore_ascii_case("q") {
        return Err(AppError::validation("Canceled."));
    }
    Ok(answer.to_string())
}

fn say<W: Write>(out: &mut W, line: &str) -> Result<(), AppError> {
    writeln!(out, "{line}").map_err(|e| AppError::io(format!("Failed to write prompt: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::error::ErrorKind;

    fn run(script: &str) -> Result<Pick, AppError> {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        pick_product(&mut input, &mut out)
    }

    #[test]
    fn number_then_defaults() {
        let pick = run("1\n\n\n").unwrap();
        assert_eq!(pick.product.name, "Rectangular Duct");
        assert_eq!(pick.selections["thickness"], "24 ga");
        assert_eq!(pick.selections["dimensions"], "12\"x8\"");
    }

    #[test]
    fn name_and_explicit_values_with_retries() {
        let pick = run("99\nelbows\n3\n90°\n2\n").unwrap();
        assert_eq!(pick.product.name, "Elbows");
        assert_eq!(pick.selections["angle"], "90°");
        assert_eq!(pick.selections["diameter"], "8\"");
    }

    #[test]
    fn quit_and_eof_cancel() {
        assert_eq!(run("q\n").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(run("").unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn option_pairs_parse() {
        let raw = vec!["thickness=22 ga".to_string(), " dimensions = 16\"x10\"".to_string()];
        let s = parse_selections(&raw).unwrap();
        assert_eq!(s["thickness"], "22 ga");
        assert_eq!(s["dimensions"], "16\"x10\"");

        let err = parse_selections(&["thickness".to_string()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
