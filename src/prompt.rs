use crate::core::models::SummaryRequest;

/// Section headings the model is asked to produce, in order.
pub const SUMMARY_SECTIONS: [&str; 4] = [
    "Story So Far",
    "Key Plot Points",
    "Character Development",
    "Themes",
];

/// Builds the single user instruction sent to the model. The summary is
/// bounded at the requested chapter.
#[must_use]
pub fn build_summary_prompt(request: &SummaryRequest) -> String {
    let SummaryRequest {
        title,
        author,
        chapter,
    } = request;

    format!(
        "Please provide a comprehensive summary of \"{title}\" by {author}, covering everything up to and including chapter {chapter}.\n\
         \n\
         Please structure your response as follows:\n\
         \n\
         1. **{s1}**: A detailed overview of what has happened up to chapter {chapter}\n\
         2. **{s2}**: Major events and developments, in chronological order\n\
         3. **{s3}**: Important changes or revelations about main characters\n\
         4. **{s4}**: Major themes that have been introduced or developed\n\
         \n\
         Please be thorough but concise. Do not include any spoilers beyond chapter {chapter}.",
        s1 = SUMMARY_SECTIONS[0],
        s2 = SUMMARY_SECTIONS[1],
        s3 = SUMMARY_SECTIONS[2],
        s4 = SUMMARY_SECTIONS[3],
    )
}
