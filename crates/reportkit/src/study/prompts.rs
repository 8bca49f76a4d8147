//! Prompt builders

use super::{Message, StudySettings};

/// Summary request: N bullet points plus a one-line practical takeaway
pub fn summary_prompt(text: &str, settings: &StudySettings) -> Vec<Message> {
    vec![
        Message::system(format!(
            "당신은 {}입니다. 다음 보고서를 {}로 간결하게 요약하세요. \
             핵심 요점 {}개를 불릿으로 제공하고, 마지막에 정책/현업 적용 포인트를 1줄로 덧붙이세요.",
            settings.persona,
            settings.language.label(),
            settings.bullets()
        )),
        Message::user(text),
    ]
}

/// Quiz request: N questions, each with an answer and short explanation
pub fn quiz_prompt(text: &str, settings: &StudySettings) -> Vec<Message> {
    vec![
        Message::system(format!(
            "당신은 {}입니다. 다음 보고서를 바탕으로 {}로 퀴즈를 만드세요. \
             퀴즈는 총 {}문항이며, 각 문항은 질문과 간단한 정답/해설을 포함합니다.",
            settings.persona,
            settings.language.label(),
            settings.questions()
        )),
        Message::user(text),
    ]
}

/// System prompt for follow-up questions, grounded in the report text
pub fn chat_system_prompt(settings: &StudySettings, report_text: &str) -> Message {
    Message::system(format!(
        "당신은 {}입니다. 보고서 내용을 기반으로 질문에 {}로 답하세요. \
         정확하고 실무적으로 답변합니다.\n\n[보고서]\n{}",
        settings.persona,
        settings.language.label(),
        report_text
    ))
}
