/// Closed enumeration carried on the wire as an uppercase string token.
///
/// Parsing never fails: the input is uppercased and matched against the
/// canonical tokens (and any legacy aliases); anything else, including the
/// empty string, degrades to [`WireToken::FALLBACK`]. This keeps old readers
/// working when newer peers start sending variants they don't know yet.
pub trait WireToken: Sized + Copy + PartialEq + 'static {
    /// Variant used for unrecognized or empty tokens.
    const FALLBACK: Self;

    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// Canonical uppercase token for this variant.
    fn token(self) -> &'static str;

    /// Legacy spellings accepted on read but never written.
    fn alias(_token: &str) -> Option<Self> {
        None
    }

    fn parse_token(token: &str) -> Self {
        let token = token.to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|value| value.token() == token)
            .or_else(|| Self::alias(&token))
            .unwrap_or(Self::FALLBACK)
    }
}
