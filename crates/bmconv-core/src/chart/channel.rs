use super::Key;

/// Where a tempo change takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TempoSource {
    /// Channel 03: the value is the tempo, written in hexadecimal.
    Direct,
    /// Channel 08: the value names a `#BPMxx` definition.
    Extended,
}

/// What a note channel places on its lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Channels 1x
    Tap,
    /// Channels 3x: keysound without a visible note
    Invisible,
    /// Channels 5x
    LongNote,
    /// Channels Dx
    Mine,
}

/// Recognized chart channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// 01: background keysound
    Background,
    /// 02: measure length
    Length,
    /// 03 / 08
    TempoSlope(TempoSource),
    /// 09: pause referencing a `#STOPxx` definition
    Discontinuity,
    Content { key: Key, kind: ContentKind },
}

impl Channel {
    /// Identify a two-character channel code. Unknown codes yield `None`
    /// and are skipped by callers.
    pub fn from_code(code: &str) -> Option<Self> {
        let mut chars = code.chars().map(|c| c.to_ascii_uppercase());
        let (group, digit) = match (chars.next(), chars.next(), chars.next()) {
            (Some(group), Some(digit), None) => (group, digit),
            _ => return None,
        };

        match (group, digit) {
            ('0', '1') => Some(Self::Background),
            ('0', '2') => Some(Self::Length),
            ('0', '3') => Some(Self::TempoSlope(TempoSource::Direct)),
            ('0', '8') => Some(Self::TempoSlope(TempoSource::Extended)),
            ('0', '9') => Some(Self::Discontinuity),
            (group, digit) => {
                let kind = match group {
                    '1' => ContentKind::Tap,
                    '3' => ContentKind::Invisible,
                    '5' => ContentKind::LongNote,
                    'D' => ContentKind::Mine,
                    _ => return None,
                };
                let key = Key::from_channel_digit(digit)?;
                Some(Self::Content { key, kind })
            }
        }
    }

    /// Whether `00` slots carry meaning on this channel.
    pub fn keeps_rests(&self) -> bool {
        matches!(
            self,
            Self::Content {
                kind: ContentKind::LongNote,
                ..
            }
        )
    }
}
