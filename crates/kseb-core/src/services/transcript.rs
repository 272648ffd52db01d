use crate::domain::ChannelMessage;

/// Render channel messages as a newline-separated transcript.
pub fn format_transcript(messages: &[ChannelMessage]) -> String {
    messages
        .iter()
        .map(ChannelMessage::transcript_line)
        .collect::<Vec<_>>()
        .join("\n")
}
