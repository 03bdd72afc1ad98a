//! Text rendering of menus and leaf results.

use crate::locale::{Locale, Phrase};
use crate::menu::MenuNode;

/// Render a menu: title, one `"{code}. {label}"` line per child in catalog
/// order, then the back footer (or exit, for the root).
pub fn menu(node: &MenuNode, is_root: bool, locale: Locale) -> String {
    let mut lines = vec![node.label(locale).to_string()];
    if let Some(children) = node.children() {
        lines.extend(
            children
                .iter()
                .map(|child| format!("{}. {}", child.option_code, child.label(locale))),
        );
    }
    let footer = if is_root { Phrase::Exit } else { Phrase::Back };
    lines.push(footer.text(locale).to_string());
    lines.join("\n")
}

/// Render a menu again after an unmatched option.
pub fn invalid_choice(node: &MenuNode, is_root: bool, locale: Locale) -> String {
    format!(
        "{}\n\n{}",
        Phrase::InvalidChoice.text(locale),
        menu(node, is_root, locale)
    )
}

/// Render the text returned by an action or input handler.
pub fn result(text: &str, locale: Locale) -> String {
    format!("{}\n\n{}", text, Phrase::ResultFooter.text(locale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Labels;
    use crate::menu::handler;

    fn services() -> MenuNode {
        let noop = handler(|_| async { Ok(String::new()) });
        MenuNode::menu(
            "services",
            "1",
            Labels::new("Xidmətlər", "Услуги", "Services"),
            vec![
                MenuNode::action(
                    "balance",
                    "1",
                    Labels::new("Balans", "Баланс", "Balance"),
                    noop.clone(),
                ),
                MenuNode::action("tariff", "2", Labels::new("Tarif", "Тариф", "Tariff"), noop),
            ],
        )
    }

    #[test]
    fn renders_children_in_declared_order() {
        assert_eq!(
            menu(&services(), false, Locale::En),
            "Services\n1. Balance\n2. Tariff\n0 - Back"
        );
    }

    #[test]
    fn root_footer_is_exit() {
        assert_eq!(
            menu(&services(), true, Locale::Az),
            "Xidmətlər\n1. Balans\n2. Tarif\n0 - Çıxış"
        );
    }

    #[test]
    fn invalid_choice_prefixes_menu() {
        assert_eq!(
            invalid_choice(&services(), false, Locale::En),
            "Invalid choice!\n\nServices\n1. Balance\n2. Tariff\n0 - Back"
        );
    }

    #[test]
    fn result_footer_is_fixed() {
        assert_eq!(result("Balance: 25.50", Locale::En), "Balance: 25.50\n\n0 - Back");
        assert_eq!(result("Баланс: 25.50", Locale::Ru), "Баланс: 25.50\n\n0 - Назад");
    }
}
