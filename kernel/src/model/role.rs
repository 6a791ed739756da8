use strum::{AsRefStr, EnumIter, EnumString};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter, EnumString)]
pub enum Role {
    Admin,
    #[default]
    User,
}
