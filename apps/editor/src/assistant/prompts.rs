// Prompt text for the resume assistant. The canned generator keys off the opening
// phrases, so keep `IMPROVE_LEAD` and `ATS_LEAD` at the start of their prompts.

pub const SYSTEM_PROMPT: &str = "You are an AI resume assistant helping a user create a \
    professional resume. Provide specific, actionable advice that highlights achievements \
    and quantifiable results.";

pub const IMPROVE_LEAD: &str = "Improve the following";
pub const ATS_LEAD: &str = "Analyze the compatibility";

pub fn improve_prompt(section: &str, content: &str) -> String {
    format!(
        "{IMPROVE_LEAD} {section} section of a resume to be more impactful, quantifiable, \
         and achievement-oriented:\n\n{content}\n\n\
         Focus on:\n\
         1. Using strong action verbs\n\
         2. Adding specific metrics and achievements\n\
         3. Removing filler words and passive voice\n\
         4. Ensuring it's relevant for ATS systems\n\n\
         Write the rewritten content as lines starting with \"• \"."
    )
}

pub fn ats_prompt(job_description: &str, resume_text: &str) -> String {
    format!(
        "{ATS_LEAD} between this job description:\n\n\"{job_description}\"\n\n\
         And this resume content:\n\n\"{resume_text}\"\n\n\
         Provide a detailed analysis including:\n\
         1. Key keywords missing from the resume\n\
         2. Specific recommendations to improve the match\n\
         3. Strengths of the current resume for this position"
    )
}

pub fn chat_prompt(message: &str) -> String {
    format!("The user asks about their resume:\n\n{message}\n\nAnswer concisely.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_lead_with_markers() {
        assert!(improve_prompt("summary", "x").starts_with(IMPROVE_LEAD));
        assert!(ats_prompt("jd", "cv").starts_with(ATS_LEAD));
        assert!(!chat_prompt("hello").starts_with(IMPROVE_LEAD));
    }

    #[test]
    fn test_improve_prompt_embeds_section_and_content() {
        let prompt = improve_prompt("experience", "Worked on team projects");
        assert!(prompt.contains("experience section"));
        assert!(prompt.contains("Worked on team projects"));
    }
}
