//! Method signatures in `<pkg.Class: ret name(p1,p2)>` form.
//!
//! This is the textual form `Method.invoke` and `Constructor.newInstance`
//! targets take in a trace, and the key the program model indexes methods by.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

/// Name used for constructors.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// A parsed method signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    /// Fully qualified declaring class
    pub class: SmolStr,
    /// Return type as written
    pub return_type: SmolStr,
    /// Simple method name
    pub name: SmolStr,
    /// Parameter types as written
    pub params: Vec<SmolStr>,
}

impl MethodSignature {
    /// Create a signature from its parts.
    pub fn new<P, S>(
        class: impl Into<SmolStr>,
        return_type: impl Into<SmolStr>,
        name: impl Into<SmolStr>,
        params: P,
    ) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            class: class.into(),
            return_type: return_type.into(),
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this signature names a constructor.
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }

    /// Parse a signature, returning `None` if it is not well formed.
    pub fn parse(s: &str) -> Option<Self> {
        let inner = s.trim().strip_prefix('<')?.strip_suffix('>')?;
        let (class, rest) = inner.split_once(": ")?;
        let (return_type, rest) = rest.trim_start().split_once(' ')?;
        let open = rest.find('(')?;
        let name = &rest[..open];
        let params = rest[open + 1..].strip_suffix(')')?;

        if class.is_empty() || return_type.is_empty() || name.is_empty() {
            return None;
        }

        let params = if params.trim().is_empty() {
            Vec::new()
        } else {
            params.split(',').map(|p| SmolStr::new(p.trim())).collect()
        };
        if params.iter().any(|p| p.is_empty()) {
            return None;
        }

        Some(Self {
            class: SmolStr::new(class.trim()),
            return_type: SmolStr::new(return_type),
            name: SmolStr::new(name.trim()),
            params,
        })
    }
}

impl FromStr for MethodSignature {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(())
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {} {}(", self.class, self.return_type, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(param)?;
        }
        f.write_str(")>")
    }
}
