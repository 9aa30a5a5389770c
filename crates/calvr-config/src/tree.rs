/// A literal on the right-hand side of `key: value`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
    /// Bare word such as `true`, `cosine`, `interlaced`.
    Ident(String),
    /// `[r, g, b, a]` bytes.
    Color([u8; 4]),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Integral view of a number. Fractional values are rejected rather than truncated.
    pub fn as_i64(&self) -> Option<i64> {
        let n = self.as_f64()?;
        (n.fract() == 0.0 && n.is_finite()).then_some(n as i64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Number(n) if *n == 0.0 => Some(false),
            Value::Number(n) if *n == 1.0 => Some(true),
            Value::Ident(s) | Value::Str(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" => Some(true),
                "false" | "off" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Text of a string or bare word.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Ident(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<[u8; 4]> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Value(Value),
    Section(Section),
}

/// Ordered list of named entries. Names may repeat; the last one wins on lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub entries: Vec<(String, Entry)>,
}

impl Section {
    fn find_value(&self, segments: &[&str]) -> Option<&Value> {
        let (head, tail) = segments.split_first()?;
        self.entries.iter().rev().find_map(|(name, entry)| {
            if name != head {
                return None;
            }
            match entry {
                Entry::Value(v) if tail.is_empty() => Some(v),
                Entry::Section(s) if !tail.is_empty() => s.find_value(tail),
                _ => None,
            }
        })
    }

    fn find_section(&self, segments: &[&str]) -> Option<&Section> {
        let Some((head, tail)) = segments.split_first() else {
            return Some(self);
        };
        self.entries.iter().rev().find_map(|(name, entry)| match entry {
            Entry::Section(s) if name == head => s.find_section(tail),
            _ => None,
        })
    }
}

/// Parsed configuration with dot-path lookups (`"FrameRate.target"`).
///
/// Typed getters take a default in the same way every call site in the kernel
/// reads a setting: the value is used when present and of the right kind,
/// otherwise the default is returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    root: Section,
}

impl ConfigTree {
    pub fn new(root: Section) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Section {
        &self.root
    }

    /// Appends every entry of `other`; on lookup its values shadow ours.
    pub fn merge(&mut self, other: ConfigTree) {
        self.root.entries.extend(other.root.entries);
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        let segments: Vec<&str> = path.split('.').collect();
        self.root.find_value(&segments)
    }

    pub fn section(&self, path: &str) -> Option<&Section> {
        if path.is_empty() {
            return Some(&self.root);
        }
        let segments: Vec<&str> = path.split('.').collect();
        self.root.find_section(&segments)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn try_int(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(Value::as_i64)
    }

    pub fn try_float(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(Value::as_f64)
    }

    pub fn try_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    pub fn try_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn try_color(&self, path: &str) -> Option<[u8; 4]> {
        self.get(path).and_then(Value::as_color)
    }

    pub fn get_int(&self, path: &str, default: i64) -> i64 {
        self.try_int(path).unwrap_or(default)
    }

    pub fn get_float(&self, path: &str, default: f64) -> f64 {
        self.try_float(path).unwrap_or(default)
    }

    pub fn get_bool(&self, path: &str, default: bool) -> bool {
        self.try_bool(path).unwrap_or(default)
    }

    pub fn get_str<'a>(&'a self, path: &str, default: &'a str) -> &'a str {
        self.try_str(path).unwrap_or(default)
    }

    pub fn get_color(&self, path: &str, default: [u8; 4]) -> [u8; 4] {
        self.try_color(path).unwrap_or(default)
    }
}
