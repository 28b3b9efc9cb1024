pub mod birthdays;
pub mod purchases;
