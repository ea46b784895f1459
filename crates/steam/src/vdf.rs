use crate::SteamError;

/// A value in a text VDF (KeyValues) document.
#[derive(Debug, Clone, PartialEq)]
pub enum VdfValue {
    String(String),
    Object(VdfObject),
}

impl VdfValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            VdfValue::String(s) => Some(s),
            VdfValue::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&VdfObject> {
        match self {
            VdfValue::Object(o) => Some(o),
            VdfValue::String(_) => None,
        }
    }
}

/// An ordered list of key/value pairs. Keys may repeat; lookups return the
/// last occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VdfObject {
    entries: Vec<(String, VdfValue)>,
}

impl VdfObject {
    /// Returns the value for `key`, matched exactly.
    pub fn get(&self, key: &str) -> Option<&VdfValue> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns the value for `key`, ignoring ASCII case.
    pub fn get_ignore_case(&self, key: &str) -> Option<&VdfValue> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Walks nested objects by key (case-insensitive). Returns `None` as soon
    /// as a key is missing or names a string.
    pub fn get_path(&self, path: &[&str]) -> Option<&VdfObject> {
        path.iter()
            .try_fold(self, |obj, key| obj.get_ignore_case(key)?.as_object())
    }

    /// Iterates entries in document order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VdfValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, key: String, value: VdfValue) {
        self.entries.push((key, value));
    }
}

/// Parses a text VDF document into its root object.
pub fn parse(text: &str) -> Result<VdfObject, SteamError> {
    let mut lexer = Lexer::new(text.as_bytes());
    parse_object(&mut lexer, true)
}

#[derive(Debug, PartialEq)]
enum Token {
    Str(String),
    Open,
    Close,
    Conditional,
}

struct Lexer<'a> {
    data: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(data: &'a [u8]) -> Self {
        // Tolerate a UTF-8 BOM.
        let pos = if data.starts_with(&[0xef, 0xbb, 0xbf]) { 3 } else { 0 };
        Self { data, pos, line: 1 }
    }

    fn error(&self, message: impl Into<String>) -> SteamError {
        SteamError::Vdf {
            line: self.line,
            message: message.into(),
        }
    }

    fn skip_trivia(&mut self) {
        while self.pos < self.data.len() {
            match self.data[self.pos] {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'/' if self.data.get(self.pos + 1) == Some(&b'/') => {
                    while self.pos < self.data.len() && self.data[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, SteamError> {
        self.skip_trivia();
        let Some(&b) = self.data.get(self.pos) else {
            return Ok(None);
        };

        match b {
            b'{' => {
                self.pos += 1;
                Ok(Some(Token::Open))
            }
            b'}' => {
                self.pos += 1;
                Ok(Some(Token::Close))
            }
            b'"' => self.read_quoted().map(|s| Some(Token::Str(s))),
            b'[' => {
                while self.pos < self.data.len() && self.data[self.pos] != b']' {
                    if self.data[self.pos] == b'\n' {
                        return Err(self.error("unterminated conditional"));
                    }
                    self.pos += 1;
                }
                if self.pos >= self.data.len() {
                    return Err(self.error("unterminated conditional"));
                }
                self.pos += 1;
                Ok(Some(Token::Conditional))
            }
            _ => Ok(Some(Token::Str(self.read_unquoted()))),
        }
    }

    fn read_quoted(&mut self) -> Result<String, SteamError> {
        let start_line = self.line;
        self.pos += 1;
        let mut buf = Vec::new();

        while self.pos < self.data.len() {
            let b = self.data[self.pos];
            self.pos += 1;
            match b {
                b'"' => return Ok(String::from_utf8_lossy(&buf).into_owned()),
                b'\\' => {
                    let Some(&escaped) = self.data.get(self.pos) else {
                        break;
                    };
                    self.pos += 1;
                    match escaped {
                        b'n' => buf.push(b'\n'),
                        b't' => buf.push(b'\t'),
                        b'\\' => buf.push(b'\\'),
                        b'"' => buf.push(b'"'),
                        other => {
                            buf.push(b'\\');
                            buf.push(other);
                        }
                    }
                }
                b'\n' => {
                    self.line += 1;
                    buf.push(b);
                }
                _ => buf.push(b),
            }
        }

        Err(SteamError::Vdf {
            line: start_line,
            message: "unterminated string".into(),
        })
    }

    fn read_unquoted(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.data.len() {
            match self.data[self.pos] {
                b' ' | b'\t' | b'\r' | b'\n' | b'{' | b'}' | b'"' => break,
                _ => self.pos += 1,
            }
        }
        String::from_utf8_lossy(&self.data[start..self.pos]).into_owned()
    }
}

/// Parses key/value pairs until the closing brace (or end of input at the
/// top level).
fn parse_object(lexer: &mut Lexer<'_>, top_level: bool) -> Result<VdfObject, SteamError> {
    let mut obj = VdfObject::default();

    loop {
        let key = match lexer.next_token()? {
            None if top_level => return Ok(obj),
            None => return Err(lexer.error("unexpected end of input, missing '}'")),
            Some(Token::Close) if !top_level => return Ok(obj),
            Some(Token::Close) => return Err(lexer.error("unexpected '}'")),
            Some(Token::Open) => return Err(lexer.error("expected key, got '{'")),
            Some(Token::Conditional) => continue,
            Some(Token::Str(key)) => key,
        };

        let value = match lexer.next_token()? {
            Some(Token::Str(s)) => VdfValue::String(s),
            Some(Token::Open) => VdfValue::Object(parse_object(lexer, false)?),
            Some(_) | None => {
                return Err(lexer.error(format!("missing value for key '{key}'")));
            }
        };

        obj.push(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHARED_CONFIG: &str = r#"
"UserRoamingConfigStore"
{
	"Software"
	{
		"Valve"
		{
			"Steam"
			{
				"apps"
				{
					"10"
					{
						"hidden"		"1"
						"tags"
						{
							"0"		"favorite"
						}
					}
					"20"
					{
						"LastPlayed"		"1600000000"
					}
				}
			}
		}
	}
}
"#;

    #[test]
    fn parse_nested_document() {
        let root = parse(SHARED_CONFIG).unwrap();
        let apps = root
            .get_path(&["UserRoamingConfigStore", "Software", "Valve", "Steam", "apps"])
            .unwrap();
        assert_eq!(apps.len(), 2);

        let ten = apps.get("10").and_then(VdfValue::as_object).unwrap();
        assert_eq!(ten.get("hidden").and_then(VdfValue::as_str), Some("1"));
        assert!(ten.get("tags").and_then(VdfValue::as_object).is_some());
    }

    #[test]
    fn path_lookup_ignores_case() {
        let root = parse(SHARED_CONFIG).unwrap();
        assert!(
            root.get_path(&["userroamingconfigstore", "software", "valve", "steam", "Apps"])
                .is_some()
        );
    }

    #[test]
    fn path_through_string_is_none() {
        let root = parse(r#""a" { "b" "c" }"#).unwrap();
        assert!(root.get_path(&["a", "b"]).is_none());
        assert!(root.get_path(&["a", "missing"]).is_none());
    }

    #[test]
    fn escapes_and_unquoted_tokens() {
        let root = parse("key \"a\\\"b\\\\c\\n\"\nplain value").unwrap();
        assert_eq!(root.get("key").and_then(VdfValue::as_str), Some("a\"b\\c\n"));
        assert_eq!(root.get("plain").and_then(VdfValue::as_str), Some("value"));
    }

    #[test]
    fn comments_and_conditionals_skipped() {
        let text = "// header\n\"k\" \"v\" [$WIN32]\n\"k2\" \"v2\" // trailing\n";
        let root = parse(text).unwrap();
        assert_eq!(root.len(), 2);
        assert_eq!(root.get("k2").and_then(VdfValue::as_str), Some("v2"));
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let root = parse(r#""k" "1" "k" "2""#).unwrap();
        assert_eq!(root.get("k").and_then(VdfValue::as_str), Some("2"));
        assert_eq!(root.iter().count(), 2);
    }

    #[test]
    fn reject_unclosed_object() {
        let err = parse("\"a\"\n{\n\"b\" \"c\"\n").unwrap_err();
        assert!(matches!(err, SteamError::Vdf { .. }));
    }

    #[test]
    fn reject_stray_close() {
        assert!(parse("\"a\" \"b\" }").is_err());
    }

    #[test]
    fn reject_missing_value() {
        let err = parse("\"a\" \"b\"\n\"c\"").unwrap_err();
        match err {
            SteamError::Vdf { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("'c'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reject_unterminated_string() {
        assert!(parse("\"a\" \"never closed").is_err());
    }

    #[test]
    fn empty_document() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\u{feff}").unwrap().is_empty());
    }
}
