pub mod card_view;
pub mod template_menu;
