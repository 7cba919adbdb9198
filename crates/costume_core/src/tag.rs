use std::fmt;
use std::str::FromStr;

use crate::errors::CostumeError;

/// Four-character component type identifier (`'mmdl'`, `'mesh'`, ...).
///
/// Tags are stored upper case; parsing normalises the case so `'mmdl'` and
/// `'MMDL'` compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag([u8; 4]);

impl Tag {
    pub const MMDL: Tag = Tag(*b"MMDL");
    pub const MODEL: Tag = Tag(*b"MOD ");
    pub const BONE: Tag = Tag(*b"BONE");
    pub const MESH: Tag = Tag(*b"MESH");
    pub const MATERIAL: Tag = Tag(*b"MAT ");
    pub const CMAP: Tag = Tag(*b"CMAP");
    pub const SPRITE: Tag = Tag(*b"SPRT");
    pub const PARTICLES: Tag = Tag(*b"PRTC");

    /// Builds a tag from raw bytes, upper-casing ASCII letters.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
            bytes[3].to_ascii_uppercase(),
        ])
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// The tag packed big-endian, matching the `tag32` layout of costume files.
    #[inline]
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl FromStr for Tag {
    type Err = CostumeError;

    /// Accepts `mmdl` as well as the quoted form `'mmdl'` used by costume files.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
            .unwrap_or(s);

        let bytes: [u8; 4] = raw
            .as_bytes()
            .try_into()
            .map_err(|_| CostumeError::malformed(0, format!("tag `{s}` is not four characters")))?;

        if !bytes.iter().all(u8::is_ascii) {
            return Err(CostumeError::malformed(0, format!("tag `{s}` is not ASCII")));
        }

        Ok(Self::from_bytes(bytes))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag('{self}')")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalises_case() {
        let lower: Tag = "'mmdl'".parse().unwrap();
        let upper: Tag = "MMDL".parse().unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, Tag::MMDL);
    }

    #[test]
    fn parse_keeps_trailing_space() {
        let tag: Tag = "'mat '".parse().unwrap();
        assert_eq!(tag, Tag::MATERIAL);
        assert_eq!(tag.to_string(), "MAT ");
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!("'abc'".parse::<Tag>().is_err());
        assert!("toolong".parse::<Tag>().is_err());
    }

    #[test]
    fn packed_value_is_big_endian() {
        assert_eq!(Tag::MESH.as_u32(), u32::from_be_bytes(*b"MESH"));
    }
}
