//! Built-in marketplace catalog used by the terminal client.
//!
//! Handlers stand in for listing, store and wallet services: each one waits
//! a short simulated network delay and answers from fixed data.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::CatalogError;
use crate::locale::Labels;
use crate::menu::{handler, Handler, HandlerRegistry, MenuCatalog, MenuNode};

const LOOKUP_DELAY: Duration = Duration::from_millis(150);

const LISTINGS: &[(&str, &str)] = &[
    ("iPhone 13, 128GB", "1150 AZN"),
    ("Toyota Prius 2016", "21500 AZN"),
    ("2-room flat, Yasamal", "145000 AZN"),
    ("Gaming laptop, RTX 3060", "1890 AZN"),
    ("Children's bicycle", "120 AZN"),
];

const STORES: &[(&str, &str)] = &[
    ("TechPoint", "4.9"),
    ("AutoLux Baku", "4.7"),
    ("Ev Mebel", "4.6"),
];

const BALANCE: &str = "25.50 AZN";

static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,4}(\.\d{1,2})?$").expect("amount pattern is valid"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+994\d{9}$").expect("phone pattern is valid"));

async fn simulate_lookup() {
    tokio::time::sleep(LOOKUP_DELAY).await;
}

fn latest_listings() -> Handler {
    handler(|_| async {
        simulate_lookup().await;
        Ok(LISTINGS
            .iter()
            .take(3)
            .enumerate()
            .map(|(i, (title, price))| format!("{}) {title} - {price}", i + 1))
            .collect::<Vec<_>>()
            .join("\n"))
    })
}

fn search_listings() -> Handler {
    handler(|arg: Option<String>| async move {
        let Some(keyword) = arg else {
            return Ok("Enter a keyword:".to_string());
        };
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Ok("Keyword cannot be empty.".to_string());
        }
        simulate_lookup().await;
        let hits: Vec<String> = LISTINGS
            .iter()
            .filter(|(title, _)| title.to_lowercase().contains(&keyword))
            .map(|(title, price)| format!("{title} - {price}"))
            .collect();
        if hits.is_empty() {
            return Ok(format!("No listings found for '{keyword}'."));
        }
        Ok(format!("Found {}:\n{}", hits.len(), hits.join("\n")))
    })
}

fn top_stores() -> Handler {
    handler(|_| async {
        simulate_lookup().await;
        Ok(STORES
            .iter()
            .map(|(name, rating)| format!("{name} ({rating})"))
            .collect::<Vec<_>>()
            .join("\n"))
    })
}

fn balance() -> Handler {
    handler(|_| async {
        simulate_lookup().await;
        Ok(format!("Balance: {BALANCE}"))
    })
}

fn top_up() -> Handler {
    handler(|arg: Option<String>| async move {
        let Some(amount) = arg else {
            return Ok("Enter amount (AZN):".to_string());
        };
        let amount = amount.trim();
        if !AMOUNT.is_match(amount) || amount.parse::<f64>()? <= 0.0 {
            return Ok("Invalid amount. Use digits, e.g. 10 or 12.50.".to_string());
        }
        simulate_lookup().await;
        Ok(format!("Balance topped up by {amount} AZN."))
    })
}

fn call_back() -> Handler {
    handler(|arg: Option<String>| async move {
        let Some(phone) = arg else {
            return Ok("Enter your phone number (+994XXXXXXXXX):".to_string());
        };
        let phone: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
        if !PHONE.is_match(&phone) {
            return Ok("Invalid phone number.".to_string());
        }
        simulate_lookup().await;
        Ok(format!("An operator will call you at {phone}."))
    })
}

fn help() -> Handler {
    handler(|_| async { Ok("Support: 012 555 00 00 (09:00-18:00)".to_string()) })
}

/// Handlers by name, for catalogs loaded from JSON.
pub fn registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry
        .register("latest_listings", latest_listings())
        .register("search_listings", search_listings())
        .register("top_stores", top_stores())
        .register("balance", balance())
        .register("top_up", top_up())
        .register("call_back", call_back())
        .register("help", help());
    registry
}

pub fn marketplace_catalog() -> Result<MenuCatalog, CatalogError> {
    let root = MenuNode::menu(
        "root",
        "",
        Labels::new("Bazar", "Базар", "Marketplace"),
        vec![
            MenuNode::menu(
                "listings",
                "1",
                Labels::new("Elanlar", "Объявления", "Listings"),
                vec![
                    MenuNode::action(
                        "latest_listings",
                        "1",
                        Labels::new("Son elanlar", "Последние объявления", "Latest listings"),
                        latest_listings(),
                    ),
                    MenuNode::input(
                        "search_listings",
                        "2",
                        Labels::new("Axtarış", "Поиск", "Search"),
                        search_listings(),
                    ),
                ],
            ),
            MenuNode::menu(
                "stores",
                "2",
                Labels::new("Mağazalar", "Магазины", "Stores"),
                vec![MenuNode::action(
                    "top_stores",
                    "1",
                    Labels::new("Ən yaxşı mağazalar", "Лучшие магазины", "Top stores"),
                    top_stores(),
                )],
            ),
            MenuNode::menu(
                "wallet",
                "3",
                Labels::new("Hesabım", "Мой счёт", "My account"),
                vec![
                    MenuNode::action(
                        "balance",
                        "1",
                        Labels::new("Balans", "Баланс", "Balance"),
                        balance(),
                    ),
                    MenuNode::input(
                        "top_up",
                        "2",
                        Labels::new("Balansı artır", "Пополнить баланс", "Top up"),
                        top_up(),
                    ),
                ],
            ),
            MenuNode::input(
                "call_back",
                "4",
                Labels::new("Zəng sifarişi", "Заказать звонок", "Request a call"),
                call_back(),
            ),
            MenuNode::action(
                "help",
                "5",
                Labels::new("Kömək", "Помощь", "Help"),
                help(),
            ),
        ],
    );
    MenuCatalog::new(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::engine::{EngineConfig, MenuEngine};
    use crate::locale::Locale;

    #[test]
    fn catalog_is_valid() {
        let catalog = marketplace_catalog().unwrap();
        assert_eq!(catalog.node_count(), 11);
        assert_eq!(catalog.depth(), 2);
    }

    #[test]
    fn registry_covers_every_leaf() {
        assert_eq!(registry().names().len(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn search_answers_empty_and_missing_keywords() {
        let search = search_listings();
        assert_eq!(search.call(None).await.unwrap(), "Enter a keyword:");
        assert_eq!(search.call(Some("  ")).await.unwrap(), "Keyword cannot be empty.");
        assert_eq!(
            search.call(Some("yacht")).await.unwrap(),
            "No listings found for 'yacht'."
        );
        assert_eq!(
            search.call(Some("TOYOTA")).await.unwrap(),
            "Found 1:\nToyota Prius 2016 - 21500 AZN"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn top_up_validates_amount() {
        let top_up = top_up();
        assert_eq!(
            top_up.call(Some("12.50")).await.unwrap(),
            "Balance topped up by 12.50 AZN."
        );
        for bad in ["", "abc", "0", "12.555", "100000"] {
            assert!(top_up.call(Some(bad)).await.unwrap().starts_with("Invalid amount"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn call_back_validates_phone() {
        let call_back = call_back();
        assert_eq!(
            call_back.call(Some("+994 50 123 45 67")).await.unwrap(),
            "An operator will call you at +994501234567."
        );
        assert_eq!(
            call_back.call(Some("050 123")).await.unwrap(),
            "Invalid phone number."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn full_session_in_azerbaijani() {
        let catalog = Arc::new(marketplace_catalog().unwrap());
        let engine = MenuEngine::new(catalog, EngineConfig::default());

        let r = engine.dial("demo", "*777#", Locale::Az);
        assert_eq!(
            r.text,
            "Bazar\n1. Elanlar\n2. Mağazalar\n3. Hesabım\n4. Zəng sifarişi\n5. Kömək\n0 - Çıxış"
        );

        let r = engine.submit("demo", "3", Locale::Az).await;
        assert_eq!(r.menu_id.as_deref(), Some("wallet"));

        let r = engine.submit("demo", "1", Locale::Az).await;
        assert_eq!(r.text, "Balance: 25.50 AZN\n\n0 - Geri");

        let r = engine.submit("demo", "2", Locale::Az).await;
        assert!(r.requires_input);
        let r = engine.submit("demo", "abc", Locale::Az).await;
        assert!(r.text.starts_with("Invalid amount"));
        assert!(!r.is_end);

        engine.submit("demo", "0", Locale::Az).await;
        let r = engine.submit("demo", "0", Locale::Az).await;
        assert!(r.is_end);
    }
}
