use crate::chart::Channel;

/// Classification of one chart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartLine {
    /// `#NAME value`; the name is upper-cased and the value may be empty.
    Header { name: String, value: String },
    /// `#STP xxx.yyy ms`
    ScheduledPause {
        measure: u32,
        thousandths: u32,
        millis: String,
    },
    /// `#xxx02:ratio`
    TimeSignature { measure: u32, ratio: String },
    /// `#xxxCC:data` for a recognized channel
    Channel {
        measure: u32,
        channel: Channel,
        message: String,
    },
}

/// Classify a line. Lines that carry nothing the converter understands,
/// including data for unrecognized channels, yield `None`.
pub fn parse_line(line: &str) -> Option<ChartLine> {
    let body = line.trim().strip_prefix('#')?;

    if let Some((measure, code, data)) = split_channel_line(body) {
        if code == "02" {
            return Some(ChartLine::TimeSignature {
                measure,
                ratio: data.to_string(),
            });
        }
        let data = leading_word(data);
        if data.len() < 2 {
            return None;
        }
        let channel = Channel::from_code(code)?;
        return Some(ChartLine::Channel {
            measure,
            channel,
            message: data.to_string(),
        });
    }

    let name_len = body
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(body.len());
    let (name, rest) = body.split_at(name_len);
    if name.is_empty() || !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
        return None;
    }
    let name = name.to_uppercase();
    let value = rest.trim();

    if name == "STP" {
        if let Some(pause) = parse_scheduled_pause(value) {
            return Some(pause);
        }
    }

    Some(ChartLine::Header {
        name,
        value: value.to_string(),
    })
}

/// Split `xxxCC:data` into measure, channel code and trimmed data.
fn split_channel_line(body: &str) -> Option<(u32, &str, &str)> {
    let (head, data) = body.split_once(':')?;
    if head.len() != 5 || !head.is_ascii() {
        return None;
    }
    let (measure, code) = head.split_at(3);
    if !measure.bytes().all(|b| b.is_ascii_digit())
        || !code.bytes().all(|b| b.is_ascii_alphanumeric())
    {
        return None;
    }
    Some((measure.parse().ok()?, code, data.trim()))
}

/// Leading run of ASCII alphanumerics; anything after it is ignored.
fn leading_word(data: &str) -> &str {
    let end = data
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(data.len());
    &data[..end]
}

/// `xxx.yyy ms` with a three-digit measure and three-digit thousandths.
fn parse_scheduled_pause(value: &str) -> Option<ChartLine> {
    let mut parts = value.split_whitespace();
    let (at, millis) = (parts.next()?, parts.next()?);
    let (measure, thousandths) = at.split_once('.')?;
    let three_digits = |s: &str| s.len() == 3 && s.bytes().all(|b| b.is_ascii_digit());
    if !three_digits(measure) || !three_digits(thousandths) {
        return None;
    }
    Some(ChartLine::ScheduledPause {
        measure: measure.parse().ok()?,
        thousandths: thousandths.parse().ok()?,
        millis: millis.to_string(),
    })
}
