use std::sync::LazyLock;
use ustr::Ustr;

macro_rules! str_const {
    ($($name:ident = $str:literal);*; ) => {
        $(pub static $name: LazyLock<Ustr> = LazyLock::new(|| Ustr::from($str));)*
    };
}

// Connectives:
str_const! {
    NOT = "not";
    AND = "and";
    OR = "or";
    IMP = "imp";
    IFF = "iff";
    BOT = "bot";
}

// Rule words:
str_const! {
    INTRO = "intro";
    ELIM = "elim";
    REPEAT = "repeat";
    LEM = "LEM";
    HYP = "hyp";
}

// Layout:
str_const! {
    PROVES = "proves";
    BAR_TURNSTILE = "├─";
}

pub const VERT: char = '│';
pub const COMMENT: char = '#';
pub const ANNOTATION_MARK: char = '.';

str_const! {
    FILE_EXTENSION = "fitch";
    CONFIG_FILE_NAME = "fitch.toml";
}
