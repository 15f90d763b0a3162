use crate::core::session::Action;
use chrono::NaiveDate;

pub const HELP: &str = "\
Commands:
  search <text>        look up a product by code or description
  code <code>          set the product code
  desc <text>          set the description
  qty <n>              set the quantity (at least 1)
  expiry <date>        set the expiry date (DD/MM/YYYY or YYYY-MM-DD, empty to clear)
  promo yes|no         set the promotion flag (promotional form only)
  add                  add the product to the list
  report               generate the expiry report
  clear                clear the entry fields (promotional form only)
  show                 show the form again
  help                 show this help
  quit                 leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Form(Action),
    Show,
    Help,
    Quit,
}

/// Parses one input line. `Ok(None)` means a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    let command = match keyword.to_ascii_lowercase().as_str() {
        "search" | "s" => Command::Form(Action::Search(rest.to_string())),
        "code" => Command::Form(Action::SetIdentifier(rest.to_string())),
        "desc" | "description" => Command::Form(Action::SetDescription(rest.to_string())),
        "qty" | "quantity" => {
            let quantity = rest
                .parse::<u32>()
                .map_err(|_| format!("'{}' is not a valid quantity", rest))?;
            Command::Form(Action::SetQuantity(quantity))
        }
        "expiry" => Command::Form(Action::SetExpiry(parse_date(rest)?)),
        "promo" | "promotion" => Command::Form(Action::SetPromotion(parse_yes_no(rest)?)),
        "add" => Command::Form(Action::Add),
        "report" => Command::Form(Action::GenerateReport),
        "clear" => Command::Form(Action::ClearFields),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{}', type 'help'", other)),
    };

    Ok(Some(command))
}

fn parse_date(value: &str) -> Result<Option<NaiveDate>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map(Some)
        .map_err(|_| format!("'{}' is not a date (use DD/MM/YYYY)", value))
}

fn parse_yes_no(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "false" => Ok(false),
        _ => Err(format!("'{}' is not yes or no", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form_commands() {
        assert_eq!(
            parse_command("search  chocolate milk "),
            Ok(Some(Command::Form(Action::Search("chocolate milk".to_string()))))
        );
        assert_eq!(
            parse_command("qty 6"),
            Ok(Some(Command::Form(Action::SetQuantity(6))))
        );
        assert_eq!(
            parse_command("ADD"),
            Ok(Some(Command::Form(Action::Add)))
        );
        assert_eq!(
            parse_command("promo Yes"),
            Ok(Some(Command::Form(Action::SetPromotion(true))))
        );
    }

    #[test]
    fn test_parse_expiry_formats() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(
            parse_command("expiry 31/01/2025"),
            Ok(Some(Command::Form(Action::SetExpiry(Some(date)))))
        );
        assert_eq!(
            parse_command("expiry 2025-01-31"),
            Ok(Some(Command::Form(Action::SetExpiry(Some(date)))))
        );
        assert_eq!(
            parse_command("expiry"),
            Ok(Some(Command::Form(Action::SetExpiry(None))))
        );
        assert!(parse_command("expiry 31-01").is_err());
    }

    #[test]
    fn test_parse_errors_and_blank() {
        assert_eq!(parse_command("   "), Ok(None));
        assert!(parse_command("qty many").is_err());
        assert!(parse_command("promo maybe").is_err());
        assert!(parse_command("delete 1").is_err());
        assert_eq!(parse_command("quit"), Ok(Some(Command::Quit)));
    }
}
