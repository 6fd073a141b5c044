/// The two formula shapes report designers write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `NAME(table, value, ...)`: bare values bind to the table's parameter
    /// fields in order.
    #[default]
    Positional,
    /// `TVC_QUERY("table", "field=value", ...)`.
    LiteralCall,
}

impl Dialect {
    pub const LITERAL_CALL_NAME: &'static str = "TVC_QUERY";

    pub fn for_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case(Self::LITERAL_CALL_NAME) {
            Dialect::LiteralCall
        } else {
            Dialect::Positional
        }
    }
}
