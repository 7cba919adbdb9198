//! Costume Text Reader
//!
//! Parses the line-oriented `costume v0.1` layout into a [`CostumeDesc`]:
//!
//! ```text
//! costume v0.1
//! section tags
//!     numtags 2
//!     0 'mmdl'
//!     1 'mesh'
//! section components
//!     numcomponents 2
//!     0 0 0 -1 body.3do
//!     1 1 0 0 torso
//! section chores
//!     numchores 1
//!     0 10 1 walk
//! section keys
//! chore 0
//!     1 3
//!     0 0
//!     5 1
//!     10 0
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Every failure is a
//! [`CostumeError::MalformedResource`] carrying the 1-based line number.

use costume_core::{CostumeError, Result, Tag};

use crate::desc::{ChoreDesc, ComponentDesc, CostumeDesc, TrackDesc, TrackKey};

const HEADER: &str = "costume v0.1";

/// Parses a costume resource blob.
pub fn parse_costume(data: &[u8]) -> Result<CostumeDesc> {
    let text = std::str::from_utf8(data)
        .map_err(|e| CostumeError::malformed(0, format!("resource is not valid UTF-8: {e}")))?;

    let mut lines = LineReader::new(text);

    lines.expect(HEADER)?;

    // ========================================================================
    // Tags
    // ========================================================================
    lines.expect("section tags")?;
    let num_tags = lines.count("numtags", 1)?;
    let mut tags: Vec<Option<Tag>> = vec![None; num_tags];
    for _ in 0..num_tags {
        let (line_no, line) = lines.next_line()?;
        // A tag such as 'mat ' contains a space, so it is the rest of the line.
        let (index, raw) = split_fields(line, 1);
        let index = parse_index(line_no, index.first().copied(), "tag index", num_tags)?;
        if raw.is_empty() {
            return Err(CostumeError::malformed(line_no, "missing tag"));
        }
        let tag: Tag = raw
            .parse()
            .map_err(|_| CostumeError::malformed(line_no, format!("bad tag `{raw}`")))?;
        if tags[index].replace(tag).is_some() {
            return Err(CostumeError::malformed(line_no, format!("duplicate tag index {index}")));
        }
    }

    // ========================================================================
    // Components
    // ========================================================================
    lines.expect("section components")?;
    let num_components = lines.count("numcomponents", 1)?;
    let mut components: Vec<Option<ComponentDesc>> = vec![None; num_components];
    for _ in 0..num_components {
        let (line_no, line) = lines.next_line()?;
        let (numbers, name) = split_fields(line, 4);
        if numbers.len() < 4 {
            return Err(CostumeError::malformed(
                line_no,
                format!("bad component specification line: `{line}`"),
            ));
        }

        let id = parse_index(line_no, Some(numbers[0]), "component id", num_components)?;
        let tag_index = parse_index(line_no, Some(numbers[1]), "tag index", num_tags)?;
        let _hash: i64 = parse_number(line_no, numbers[2], "component hash")?;
        let parent_raw: i64 = parse_number(line_no, numbers[3], "parent id")?;

        let tag = tags[tag_index]
            .ok_or_else(|| CostumeError::malformed(line_no, format!("tag index {tag_index} was never declared")))?;

        let parent = match parent_raw {
            -1 => None,
            p if p >= 0 && (p as usize) < num_components && components[p as usize].is_some() && p as usize != id => {
                Some(p as usize)
            }
            p => {
                return Err(CostumeError::malformed(
                    line_no,
                    format!("component {id} has parent {p} which is not a loaded component"),
                ));
            }
        };

        if components[id].is_some() {
            return Err(CostumeError::malformed(line_no, format!("duplicate component id {id}")));
        }
        components[id] = Some(ComponentDesc::new(tag, parent, name));
    }

    // Every slot is filled once num_components distinct ids were read.
    let components: Vec<ComponentDesc> = components.into_iter().flatten().collect();

    // ========================================================================
    // Chores
    // ========================================================================
    lines.expect("section chores")?;
    let num_chores = lines.count("numchores", 2)?;
    let mut chores: Vec<Option<(ChoreDesc, usize)>> = vec![None; num_chores];
    for _ in 0..num_chores {
        let (line_no, line) = lines.next_line()?;
        let (numbers, name) = split_fields(line, 3);
        if numbers.len() < 3 || name.is_empty() {
            return Err(CostumeError::malformed(
                line_no,
                format!("bad chore specification line: `{line}`"),
            ));
        }

        let id = parse_index(line_no, Some(numbers[0]), "chore id", num_chores)?;
        let length: f32 = parse_number(line_no, numbers[1], "chore length")?;
        let num_tracks: usize = parse_number(line_no, numbers[2], "track count")?;
        if !length.is_finite() || length < 0.0 {
            return Err(CostumeError::malformed(line_no, format!("invalid chore length {length}")));
        }

        if chores[id].is_some() {
            return Err(CostumeError::malformed(line_no, format!("duplicate chore id {id}")));
        }
        chores[id] = Some((ChoreDesc::new(name, length, Vec::new()), num_tracks));
    }

    // ========================================================================
    // Keys
    // ========================================================================
    lines.expect("section keys")?;
    let mut loaded = vec![false; num_chores];
    for _ in 0..num_chores {
        let (line_no, line) = lines.next_line()?;
        let which = line
            .strip_prefix("chore")
            .ok_or_else(|| CostumeError::malformed(line_no, format!("expected `chore <id>`, found `{line}`")))?;
        let which = parse_index(line_no, Some(which.trim()), "chore id", num_chores)?;
        if std::mem::replace(&mut loaded[which], true) {
            return Err(CostumeError::malformed(line_no, format!("keys for chore {which} given twice")));
        }

        let Some((chore, num_tracks)) = chores[which].as_mut() else {
            return Err(CostumeError::malformed(line_no, format!("chore {which} was never declared")));
        };

        for _ in 0..*num_tracks {
            let (line_no, line) = lines.next_line()?;
            let mut fields = line.split_whitespace();
            let component = parse_index(line_no, fields.next(), "track component", components.len())?;
            let num_keys: usize = parse_number(line_no, fields.next().unwrap_or(""), "key count")?;
            lines.ensure_remaining(line_no, num_keys, "key count")?;

            let mut keys = Vec::new();
            for _ in 0..num_keys {
                let (line_no, line) = lines.next_line()?;
                let mut fields = line.split_whitespace();
                let time: f32 = parse_number(line_no, fields.next().unwrap_or(""), "key time")?;
                let value: f32 = parse_number(line_no, fields.next().unwrap_or(""), "key value")?;
                if let Some(prev) = keys.last().map(|k: &TrackKey| k.time)
                    && time < prev
                {
                    return Err(CostumeError::malformed(
                        line_no,
                        format!("key time {time} is earlier than the previous key ({prev})"),
                    ));
                }
                keys.push(TrackKey::new(time, value));
            }

            chore.tracks.push(TrackDesc { component, keys });
        }
    }

    let chores: Vec<ChoreDesc> = chores.into_iter().flatten().map(|(c, _)| c).collect();

    log::debug!(
        "Parsed costume: {} tags, {} components, {} chores",
        num_tags,
        components.len(),
        chores.len()
    );

    let desc = CostumeDesc { components, chores };
    desc.validate()?;
    Ok(desc)
}

/// Cursor over the significant lines of a costume file.
struct LineReader<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    last_line: usize,
    /// Significant lines not yet consumed.
    remaining: usize,
}

impl<'a> LineReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            last_line: 0,
            remaining: text.lines().filter(|line| is_significant(line.trim())).count(),
        }
    }

    /// Next non-blank, non-comment line, trimmed, with its 1-based number.
    fn next_line(&mut self) -> Result<(usize, &'a str)> {
        for (index, raw) in self.lines.by_ref() {
            let line = raw.trim();
            self.last_line = index + 1;
            if !is_significant(line) {
                continue;
            }
            self.remaining -= 1;
            return Ok((index + 1, line));
        }
        Err(CostumeError::malformed(self.last_line, "unexpected end of data"))
    }

    fn expect(&mut self, expected: &str) -> Result<()> {
        let (line_no, line) = self.next_line()?;
        if line == expected {
            Ok(())
        } else {
            Err(CostumeError::malformed(
                line_no,
                format!("expected `{expected}`, found `{line}`"),
            ))
        }
    }

    /// Reads a `<keyword> <count>` line. Each counted entry takes at least
    /// `lines_per_entry` of the lines that follow.
    fn count(&mut self, keyword: &str, lines_per_entry: usize) -> Result<usize> {
        let (line_no, line) = self.next_line()?;
        let rest = line
            .strip_prefix(keyword)
            .ok_or_else(|| CostumeError::malformed(line_no, format!("expected `{keyword} <n>`, found `{line}`")))?;
        let count: usize = parse_number(line_no, rest.trim(), keyword)?;
        self.ensure_remaining(line_no, count.saturating_mul(lines_per_entry), keyword)?;
        Ok(count)
    }

    /// Rejects a declared count the rest of the data cannot possibly hold.
    fn ensure_remaining(&self, line_no: usize, needed: usize, what: &str) -> Result<()> {
        if needed > self.remaining {
            return Err(CostumeError::malformed(
                line_no,
                format!("{what} needs {needed} more lines, only {} remain", self.remaining),
            ));
        }
        Ok(())
    }
}

fn is_significant(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('#')
}

/// Splits the first `count` whitespace-separated fields off a line and returns
/// them along with the trimmed remainder (which may itself contain spaces).
fn split_fields(line: &str, count: usize) -> (Vec<&str>, &str) {
    let mut fields = Vec::with_capacity(count);
    let mut rest = line.trim_start();
    while fields.len() < count {
        let Some(field) = rest.split_whitespace().next() else {
            break;
        };
        fields.push(field);
        rest = rest[field.len()..].trim_start();
    }
    (fields, rest.trim_end())
}

fn parse_number<T: std::str::FromStr>(line: usize, raw: &str, what: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| CostumeError::malformed(line, format!("invalid {what} `{raw}`")))
}

fn parse_index(line: usize, raw: Option<&str>, what: &str, len: usize) -> Result<usize> {
    let raw = raw.ok_or_else(|| CostumeError::malformed(line, format!("missing {what}")))?;
    let index: usize = parse_number(line, raw, what)?;
    if index >= len {
        return Err(CostumeError::malformed(
            line,
            format!("{what} {index} out of range (declared {len})"),
        ));
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALK: &str = "\
costume v0.1
# tags used by this costume
section tags
    numtags 3
    0 'mmdl'
    1 'mesh'
    2 'mat '
section components
    numcomponents 3
    0 0 0 -1 body.3do
    1 1 0 0 torso
    2 2 0 1 shirt texture.mat
section chores
    numchores 2
    0 10 1 walk
    1 4 0 idle
section keys
chore 0
    1 3
    0 0
    5 1
    10 0
chore 1
";

    fn malformed_line(data: &str) -> usize {
        match parse_costume(data.as_bytes()) {
            Err(CostumeError::MalformedResource { line, .. }) => line,
            other => panic!("expected MalformedResource, got {other:?}"),
        }
    }

    #[test]
    fn parses_walk_costume() {
        let desc = parse_costume(WALK.as_bytes()).unwrap();

        assert_eq!(desc.components.len(), 3);
        assert_eq!(desc.components[0].tag, Tag::MMDL);
        assert_eq!(desc.components[0].parent, None);
        assert_eq!(desc.components[1].parent, Some(0));
        assert_eq!(desc.components[2].tag, Tag::MATERIAL);
        assert_eq!(desc.components[2].name, "shirt texture.mat");

        assert_eq!(desc.chores.len(), 2);
        let walk = &desc.chores[0];
        assert_eq!(walk.name, "walk");
        assert_eq!(walk.length, 10.0);
        assert_eq!(walk.tracks.len(), 1);
        assert_eq!(walk.tracks[0].component, 1);
        assert_eq!(
            walk.tracks[0].keys,
            vec![TrackKey::new(0.0, 0.0), TrackKey::new(5.0, 1.0), TrackKey::new(10.0, 0.0)]
        );
        assert!(desc.chores[1].tracks.is_empty());
    }

    #[test]
    fn wrong_header_is_rejected() {
        assert_eq!(malformed_line("costume v0.2\n"), 1);
    }

    #[test]
    fn truncated_data_is_rejected() {
        let cut = &WALK[..WALK.find("section chores").unwrap()];
        assert!(parse_costume(cut.as_bytes()).unwrap_err().is_malformed());
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let data = WALK.replace("1 1 0 0 torso", "1 1 0 2 torso");
        assert_eq!(malformed_line(&data), 11);
    }

    #[test]
    fn undeclared_tag_index_is_rejected() {
        let data = WALK.replace("1 1 0 0 torso", "1 5 0 0 torso");
        assert_eq!(malformed_line(&data), 11);
    }

    #[test]
    fn track_on_missing_component_is_rejected() {
        let data = WALK.replace("chore 0\n    1 3", "chore 0\n    9 3");
        assert_eq!(malformed_line(&data), 19);
    }

    #[test]
    fn decreasing_key_times_are_rejected() {
        let data = WALK.replace("    5 1\n", "    12 1\n");
        assert_eq!(malformed_line(&data), 22);
    }

    #[test]
    fn huge_tag_count_is_rejected() {
        let data = "costume v0.1\nsection tags\n    numtags 18446744073709551615\n";
        assert_eq!(malformed_line(data), 3);
    }

    #[test]
    fn counts_beyond_remaining_lines_are_rejected() {
        let data = WALK.replace("numcomponents 3", "numcomponents 400");
        assert_eq!(malformed_line(&data), 9);

        let data = WALK.replace("numchores 2", "numchores 9");
        assert_eq!(malformed_line(&data), 14);
    }

    #[test]
    fn huge_key_count_is_rejected() {
        let data = WALK.replace("chore 0\n    1 3", "chore 0\n    1 18446744073709551615");
        assert_eq!(malformed_line(&data), 19);
    }

    #[test]
    fn tag_text_follows_index_field() {
        // The tag text also occurs inside the index field.
        let data = WALK.replace("    1 'mesh'", "    01 1msh");
        let desc = parse_costume(data.as_bytes()).unwrap();
        assert_eq!(desc.components[1].tag, Tag::from_bytes(*b"1MSH"));

        let (fields, rest) = split_fields("2 'mat '", 1);
        assert_eq!((fields, rest), (vec!["2"], "'mat '"));
    }

    #[test]
    fn non_utf8_is_rejected() {
        assert!(parse_costume(&[0xff, 0xfe, 0x00]).unwrap_err().is_malformed());
    }

    #[test]
    fn split_fields_keeps_remainder() {
        let (fields, rest) = split_fields("  0 1 2  -1   my model.3do ", 4);
        assert_eq!(fields, vec!["0", "1", "2", "-1"]);
        assert_eq!(rest, "my model.3do");
    }
}
