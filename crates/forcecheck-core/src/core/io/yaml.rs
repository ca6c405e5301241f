use super::event::{EventSource, ParseEvent, TokenizerError};
use std::str::Chars;
use yaml_rust2::parser::{Event, Parser};

/// Turns YAML text into the flat [`ParseEvent`] stream consumed by the reader.
///
/// Events are pulled lazily from a `yaml-rust2` parser, so reading can stop
/// at the end of the first mapping without tokenizing the rest of the text.
/// Plain, quoted, and block scalars all surface as [`ParseEvent::Scalar`]
/// carrying the scalar text exactly as written; no value is resolved to a
/// number or boolean on the way. Duplicate keys are passed through in
/// document order.
pub struct YamlEventStream<'a> {
    parser: Parser<Chars<'a>>,
    finished: bool,
}

impl<'a> YamlEventStream<'a> {
    pub fn from_text(text: &'a str) -> Self {
        Self {
            parser: Parser::new_from_str(text),
            finished: false,
        }
    }
}

impl EventSource for YamlEventStream<'_> {
    fn next_event(&mut self) -> Result<ParseEvent, TokenizerError> {
        loop {
            if self.finished {
                return Ok(ParseEvent::StreamEnd);
            }
            let (event, marker) = self.parser.next_token().map_err(|e| {
                self.finished = true;
                TokenizerError::new(e.to_string())
            })?;
            let event = match event {
                Event::Nothing { .. } => continue,
                Event::StreamStart { .. } => ParseEvent::StreamStart,
                Event::StreamEnd { .. } => {
                    self.finished = true;
                    ParseEvent::StreamEnd
                }
                Event::DocumentStart { .. } => ParseEvent::DocumentStart,
                Event::DocumentEnd { .. } => ParseEvent::DocumentEnd,
                Event::MappingStart { .. } => ParseEvent::MappingStart,
                Event::MappingEnd { .. } => ParseEvent::MappingEnd,
                Event::SequenceStart { .. } => ParseEvent::SequenceStart,
                Event::SequenceEnd { .. } => ParseEvent::SequenceEnd,
                Event::Scalar(text, ..) => ParseEvent::Scalar(text),
                Event::Alias { .. } => {
                    self.finished = true;
                    return Err(TokenizerError::new(format!(
                        "aliases are not supported (line {}, column {})",
                        marker.line(),
                        marker.col() + 1
                    )));
                }
            };
            return Ok(event);
        }
    }
}
