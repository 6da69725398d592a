use std::collections::HashSet;

use crate::error::FormatError;

#[derive(Debug, Clone, PartialEq)]
pub enum StepValue {
    String(String),
    Real(f64),
    Integer(i64),
    Boolean(bool),
    Enum(String),
    Reference(u64),
    List(Vec<StepValue>),
    Null,
    Derived,
}

impl StepValue {
    #[must_use]
    pub fn as_reference(&self) -> Option<u64> {
        match self {
            StepValue::Reference(id) => Some(*id),
            _ => None,
        }
    }

    /// Numeric value; integers are widened so `3` and `3.` read the same.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            StepValue::Real(f) => Some(*f),
            StepValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepEntity {
    pub id: u64,
    pub entity_type: String,
    pub values: Vec<StepValue>,
}

impl StepEntity {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StepValue> {
        self.values.get(index)
    }

    #[must_use]
    pub fn get_ref(&self, index: usize) -> Option<u64> {
        self.get(index).and_then(StepValue::as_reference)
    }

    #[must_use]
    pub fn get_string(&self, index: usize) -> Option<&str> {
        match self.get(index) {
            Some(StepValue::String(s)) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_enum(&self, index: usize) -> Option<&str> {
        match self.get(index) {
            Some(StepValue::Enum(e)) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(StepValue::as_float)
    }

    #[must_use]
    pub fn get_list(&self, index: usize) -> Option<&[StepValue]> {
        match self.get(index) {
            Some(StepValue::List(list)) => Some(list),
            _ => None,
        }
    }

    /// All entity references inside a list attribute, skipping anything else.
    #[must_use]
    pub fn get_refs(&self, index: usize) -> Vec<u64> {
        self.get_list(index)
            .map(|list| list.iter().filter_map(StepValue::as_reference).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_a(&self, entity_type: &str) -> bool {
        self.entity_type == entity_type
    }
}

/// A raw ISO-10303-21 exchange file: header schema plus entity instances in
/// declaration order.
#[derive(Debug)]
pub struct StepFile {
    pub entities: Vec<StepEntity>,
    pub schema: String,
}

/// One `;`-terminated statement and the line it starts on.
struct Statement {
    line: usize,
    text: String,
}

impl StepFile {
    pub fn parse(content: &str) -> Result<Self, FormatError> {
        let mut entities = Vec::new();
        let mut seen = HashSet::new();
        let mut schema = None;
        let mut in_data = false;
        let mut saw_data = false;

        for statement in split_statements(content)? {
            let text = statement.text.as_str();

            // Parse schema
            if text.starts_with("FILE_SCHEMA") {
                schema = parse_schema_name(text);
                continue;
            }

            if text == "DATA" {
                in_data = true;
                saw_data = true;
                continue;
            }
            if text == "ENDSEC" {
                in_data = false;
                continue;
            }

            if !in_data {
                continue;
            }

            if !text.starts_with('#') {
                return Err(FormatError::InvalidStep {
                    message: format!(
                        "line {}: expected entity instance, found '{}'",
                        statement.line,
                        excerpt(text)
                    ),
                });
            }

            match Self::parse_entity_line(text) {
                Some(entity) if entity.entity_type.is_empty() => {
                    // Complex instances like #5=(IFCA()IFCB()) are not addressable by type.
                    tracing::debug!(id = entity.id, "skipping complex entity instance");
                }
                Some(entity) => {
                    if !seen.insert(entity.id) {
                        return Err(FormatError::DuplicateEntity { id: entity.id });
                    }
                    entities.push(entity);
                }
                None => {
                    return Err(FormatError::InvalidStep {
                        message: format!(
                            "line {}: malformed entity instance '{}'",
                            statement.line,
                            excerpt(text)
                        ),
                    });
                }
            }
        }

        let schema = schema.ok_or(FormatError::MissingSchema)?;
        if !saw_data {
            return Err(FormatError::MissingDataSection);
        }

        Ok(StepFile { entities, schema })
    }

    fn parse_entity_line(line: &str) -> Option<StepEntity> {
        // Format: #123=IFCWALL('guid',#ref,'name',...)
        let eq_pos = line.find('=')?;
        let id: u64 = line[1..eq_pos].trim().parse().ok()?;

        let rest = line[eq_pos + 1..].trim();
        if !rest.ends_with(')') {
            return None;
        }
        let paren_pos = rest.find('(')?;
        let entity_type = rest[..paren_pos].trim().to_ascii_uppercase();
        if !entity_type
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return None;
        }

        let values_str = &rest[paren_pos + 1..rest.len() - 1];
        let values = if entity_type.is_empty() {
            Vec::new()
        } else {
            Self::parse_values(values_str)?
        };

        Some(StepEntity {
            id,
            entity_type,
            values,
        })
    }

    /// Splits a comma-separated attribute list. `None` on unbalanced
    /// parentheses, an unterminated string or an unreadable bare token.
    fn parse_values(s: &str) -> Option<Vec<StepValue>> {
        let mut values = Vec::new();
        let mut current = String::new();
        let mut in_string = false;
        let mut paren_depth: usize = 0;

        for ch in s.chars() {
            match ch {
                '\'' => {
                    in_string = !in_string;
                    current.push(ch);
                }
                '(' if !in_string => {
                    paren_depth += 1;
                    current.push(ch);
                }
                ')' if !in_string => {
                    paren_depth = paren_depth.checked_sub(1)?;
                    current.push(ch);
                }
                ',' if !in_string && paren_depth == 0 => {
                    values.push(Self::parse_single_value(current.trim())?);
                    current.clear();
                }
                _ => current.push(ch),
            }
        }

        if in_string || paren_depth != 0 {
            return None;
        }

        if !current.trim().is_empty() {
            values.push(Self::parse_single_value(current.trim())?);
        }

        Some(values)
    }

    fn parse_single_value(s: &str) -> Option<StepValue> {
        let s = s.trim();

        if s == "$" {
            return Some(StepValue::Null);
        }
        if s == "*" {
            return Some(StepValue::Derived);
        }
        if let Some(stripped) = s.strip_prefix('#') {
            if let Ok(id) = stripped.trim().parse::<u64>() {
                return Some(StepValue::Reference(id));
            }
        }
        if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
            let raw = &s[1..s.len() - 1];
            return Some(StepValue::String(decode_step_string(raw)));
        }
        // Binary literal, kept as its hex digits
        if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
            return Some(StepValue::String(s[1..s.len() - 1].to_string()));
        }
        if s.len() >= 2 && s.starts_with('.') && s.ends_with('.') {
            let inner = &s[1..s.len() - 1];
            if inner == "T" {
                return Some(StepValue::Boolean(true));
            }
            if inner == "F" {
                return Some(StepValue::Boolean(false));
            }
            return Some(StepValue::Enum(inner.to_string()));
        }
        if s.starts_with('(') && s.ends_with(')') {
            let inner = &s[1..s.len() - 1];
            return Self::parse_values(inner).map(StepValue::List);
        }
        // Rust also parses `inf` and `NaN`, which STEP has no spelling for.
        if s.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.')) {
            if let Ok(i) = s.parse::<i64>() {
                return Some(StepValue::Integer(i));
            }
            return s.parse::<f64>().ok().map(StepValue::Real);
        }
        // Typed value like IFCLENGTHMEASURE(2.5) or IFCBOOLEAN(.T.)
        if let Some(paren_pos) = s.find('(') {
            if s.ends_with(')') {
                let inner = &s[paren_pos + 1..s.len() - 1];
                return Self::parse_single_value(inner);
            }
        }

        None
    }
}

/// Cuts the text into `;`-terminated statements, ignoring `;` inside string
/// literals and dropping `/* ... */` comments. Statements may span lines.
fn split_statements(content: &str) -> Result<Vec<Statement>, FormatError> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut start_line = 1;
    let mut line = 1;
    let mut in_string = false;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\n' {
            line += 1;
        }
        if in_string {
            if ch == '\'' {
                in_string = false;
            }
            current.push(ch);
            continue;
        }
        match ch {
            '\'' => {
                in_string = true;
                current.push(ch);
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                    }
                    if prev == '*' && c == '/' {
                        closed = true;
                        break;
                    }
                    prev = c;
                }
                if !closed {
                    return Err(FormatError::InvalidStep {
                        message: format!("line {line}: unterminated comment"),
                    });
                }
            }
            ';' => {
                let text = current.trim();
                if !text.is_empty() {
                    statements.push(Statement {
                        line: start_line,
                        text: text.to_string(),
                    });
                }
                current.clear();
            }
            '\r' | '\n' => {
                if !current.is_empty() {
                    current.push(' ');
                }
            }
            _ => {
                if current.trim().is_empty() {
                    start_line = line;
                }
                current.push(ch);
            }
        }
    }

    if in_string {
        return Err(FormatError::InvalidStep {
            message: format!("line {start_line}: unterminated string literal"),
        });
    }
    if !current.trim().is_empty() {
        return Err(FormatError::InvalidStep {
            message: format!(
                "line {start_line}: statement not terminated by ';': '{}'",
                excerpt(current.trim())
            ),
        });
    }

    Ok(statements)
}

/// Extracts the first schema identifier from `FILE_SCHEMA(('IFC2X3'))`.
fn parse_schema_name(statement: &str) -> Option<String> {
    let start = statement.find('\'')?;
    let end = statement[start + 1..].find('\'')?;
    let name = statement[start + 1..start + 1 + end].trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn excerpt(text: &str) -> String {
    const MAX: usize = 60;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX).collect();
        format!("{cut}...")
    }
}

/// Decode STEP/IFC encoded strings with Unicode escape sequences.
/// Supports:
/// - `\X2\XXXX\X0\` - 2-byte Unicode (BMP), can have multiple 4-char hex codes
/// - `\X\XX` - 1-byte ISO 8859-1
/// - `\S\X` - ISO 8859-1 high-bit shift
/// - `\\` - escaped backslash
/// - `''` - escaped apostrophe
fn decode_step_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.peek() {
                Some('X') => {
                    chars.next(); // consume 'X'
                    match chars.peek() {
                        Some('2') => {
                            chars.next(); // consume '2'
                            chars.next(); // consume '\'

                            let mut hex = String::new();
                            while let Some(&c) = chars.peek() {
                                if c == '\\' {
                                    break;
                                }
                                hex.push(c);
                                chars.next();
                            }
                            // Skip \X0\
                            if chars.peek() == Some(&'\\') {
                                for _ in 0..4 {
                                    chars.next();
                                }
                            }
                            for chunk in hex.as_bytes().chunks(4) {
                                let code = std::str::from_utf8(chunk)
                                    .ok()
                                    .and_then(|s| u32::from_str_radix(s, 16).ok())
                                    .and_then(char::from_u32);
                                if let (4, Some(c)) = (chunk.len(), code) {
                                    result.push(c);
                                }
                            }
                        }
                        Some('\\') => {
                            chars.next(); // consume '\'
                            let hex: String = chars.by_ref().take(2).collect();
                            if let Ok(code) = u8::from_str_radix(&hex, 16) {
                                result.push(char::from(code));
                            }
                        }
                        _ => {
                            result.push('\\');
                            result.push('X');
                        }
                    }
                }
                Some('\\') => {
                    chars.next();
                    result.push('\\');
                }
                Some('S') => {
                    chars.next(); // 'S'
                    chars.next(); // '\'
                    if let Some(c) = chars.next().and_then(|c| char::from_u32(u32::from(c) + 128)) {
                        result.push(c);
                    }
                }
                _ => result.push('\\'),
            }
        } else if ch == '\'' {
            // '' is escaped apostrophe in STEP
            if chars.peek() == Some(&'\'') {
                chars.next();
            }
            result.push('\'');
        } else {
            result.push(ch);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCCARTESIANPOINT((2.,3.,0.));
#2=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',$,'Wall; north',$,$,#3,
  $,$,$);
/* trailing comment */
#3=IFCLOCALPLACEMENT($,#4);
ENDSEC;
END-ISO-10303-21;
";

    #[test]
    fn parses_header_schema_and_entities_in_order() {
        let file = StepFile::parse(MINIMAL).unwrap();
        assert_eq!(file.schema, "IFC4");
        let ids: Vec<u64> = file.entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn multi_line_instance_and_semicolon_in_string() {
        let file = StepFile::parse(MINIMAL).unwrap();
        let wall = &file.entities[1];
        assert_eq!(wall.entity_type, "IFCWALL");
        assert_eq!(wall.get_string(2), Some("Wall; north"));
        assert_eq!(wall.get_ref(5), Some(3));
        assert_eq!(wall.values.len(), 9);
    }

    #[test]
    fn nested_lists_and_typed_values() {
        let entity =
            StepFile::parse_entity_line("#9=IFCQUANTITYAREA('Net(Side)Area',$,$,IFCAREAMEASURE(12.5),$)")
                .unwrap();
        assert_eq!(entity.get_string(0), Some("Net(Side)Area"));
        assert_eq!(entity.get_float(3), Some(12.5));

        let point = StepFile::parse_entity_line("#1=IFCCARTESIANPOINT((2.,3,-1.5E1))").unwrap();
        let coords: Vec<f64> = point
            .get_list(0)
            .unwrap()
            .iter()
            .filter_map(StepValue::as_float)
            .collect();
        assert_eq!(coords, vec![2.0, 3.0, -15.0]);
    }

    #[test]
    fn rejects_unbalanced_instance() {
        let content = "HEADER;FILE_SCHEMA(('IFC2X3'));ENDSEC;DATA;#1=IFCWALL('a',(#2,#3);ENDSEC;";
        assert!(matches!(
            StepFile::parse(content),
            Err(FormatError::InvalidStep { .. })
        ));
    }

    #[test]
    fn rejects_bare_words_where_numbers_belong() {
        for point in ["(inf,NaN,0.)", "(infinity,0.,0.)", "(1.,-,0.)"] {
            let content = format!("FILE_SCHEMA(('IFC4'));DATA;#1=IFCCARTESIANPOINT({point});ENDSEC;");
            assert!(
                matches!(StepFile::parse(&content), Err(FormatError::InvalidStep { .. })),
                "{point} should not parse"
            );
        }
        let signed = StepFile::parse_entity_line("#1=IFCCARTESIANPOINT((+1.,.5,-0.))").unwrap();
        assert_eq!(signed.get_list(0).map(<[StepValue]>::len), Some(3));
    }

    #[test]
    fn rejects_missing_schema_and_data() {
        assert!(matches!(
            StepFile::parse("HEADER;ENDSEC;DATA;ENDSEC;"),
            Err(FormatError::MissingSchema)
        ));
        assert!(matches!(
            StepFile::parse("HEADER;FILE_SCHEMA(('IFC4'));ENDSEC;"),
            Err(FormatError::MissingDataSection)
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let content = "FILE_SCHEMA(('IFC4'));DATA;#1=IFCDOOR($);#1=IFCWINDOW($);ENDSEC;";
        assert!(matches!(
            StepFile::parse(content),
            Err(FormatError::DuplicateEntity { id: 1 })
        ));
    }

    #[test]
    fn decodes_escaped_strings() {
        assert_eq!(decode_step_string("Stra\\X2\\00DF\\X0\\e"), "Straße");
        assert_eq!(decode_step_string("It''s"), "It's");
        assert_eq!(decode_step_string("\\X\\E9t\\X\\E9"), "été");
        assert_eq!(decode_step_string("a\\\\b"), "a\\b");
    }
}
