#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    White=0, Black=1
}

impl Color {
    pub const LIMIT: u8 = 2;

    pub const fn from(is_black: bool) -> Color {
        if is_black { Color::Black } else { Color::White }
    }

    pub fn iter() -> impl Iterator<Item = Color> {
        [Color::White, Color::Black].into_iter()
    }
}
