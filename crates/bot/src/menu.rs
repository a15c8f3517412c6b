use platey_core::CatalogBinding;

use crate::outbox::Choice;
use crate::update::{menu_token, MenuCommand};

/// The main-menu surface, generated from the configured catalog
/// bindings. Adding a category is a config edit; no keyboard literal is
/// maintained by hand.
pub struct MenuSurface {
    categories: Vec<(String, String)>,
}

impl MenuSurface {
    pub fn from_bindings(bindings: &[CatalogBinding]) -> Self {
        let categories = bindings
            .iter()
            .map(|binding| (binding.label.clone(), binding.name.clone()))
            .collect();
        Self { categories }
    }

    /// One browse button per category, then the two search entries.
    pub fn main_menu(&self) -> Vec<Choice> {
        let mut choices: Vec<Choice> = self
            .categories
            .iter()
            .map(|(label, name)| {
                Choice::new(
                    label.clone(),
                    menu_token(&MenuCommand::Browse { category: name.clone() }),
                )
            })
            .collect();

        choices.push(Choice::new("🔢 Поиск по цифрам", menu_token(&MenuCommand::SearchByDigits)));
        choices.push(Choice::new("🔤 Поиск по буквам", menu_token(&MenuCommand::SearchByLetters)));
        choices
    }

    pub fn label_for(&self, category: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|(_, name)| name == category)
            .map(|(label, _)| label.as_str())
    }
}

pub fn next_page_choice() -> Choice {
    Choice::new("➡️ Дальше", menu_token(&MenuCommand::NextPage))
}

pub fn return_to_menu_choice() -> Choice {
    Choice::new("🔙 В меню", menu_token(&MenuCommand::ReturnToMenu))
}

#[cfg(test)]
mod tests {
    use platey_core::{CatalogBinding, SourceSpec};

    use super::MenuSurface;

    fn bindings() -> Vec<CatalogBinding> {
        vec![
            CatalogBinding {
                name: "moto".to_owned(),
                label: "🏍 Мото номера".to_owned(),
                source: SourceSpec::Text { path: "moto_numbers.txt".into() },
            },
            CatalogBinding {
                name: "auto".to_owned(),
                label: "🚗 Авто номера".to_owned(),
                source: SourceSpec::Text { path: "auto_numbers.txt".into() },
            },
        ]
    }

    #[test]
    fn menu_lists_categories_in_binding_order_then_searches() {
        let menu = MenuSurface::from_bindings(&bindings());

        let choices = menu.main_menu();

        assert_eq!(choices.len(), 4);
        assert_eq!(choices[0].data, "browse:moto");
        assert_eq!(choices[1].data, "browse:auto");
        assert_eq!(choices[2].data, "digits");
        assert_eq!(choices[3].data, "letters");
    }

    #[test]
    fn labels_resolve_by_category_name() {
        let menu = MenuSurface::from_bindings(&bindings());
        assert_eq!(menu.label_for("auto"), Some("🚗 Авто номера"));
        assert_eq!(menu.label_for("boats"), None);
    }
}
