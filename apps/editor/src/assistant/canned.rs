//! Offline text generator used when no model API key is configured.
//!
//! Replies are picked at random from fixed sets, keyed on which assistant prompt came in.

use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::assistant::prompts::{ATS_LEAD, IMPROVE_LEAD};
use crate::llm_client::{LlmError, TextGenerator};

const IMPROVEMENTS: &[&str] = &[
    "Here's an improved version of your content:\n\n\
     • Spearheaded development of microservices architecture serving 1M+ active users, resulting in 40% performance improvement and 99.9% uptime\n\
     • Implemented comprehensive automated testing suite with Jest and Cypress, reducing bug reports by 60% and accelerating deployment cycles by 50%\n\
     • Mentored cross-functional team of 5 junior developers through code reviews and pair programming, leading to 25% faster project delivery and improved code quality\n\n\
     Key improvements made:\n\
     ✓ Added specific metrics and numbers\n\
     ✓ Used strong action verbs\n\
     ✓ Highlighted business impact\n\
     ✓ Included technical details",
    "Enhanced version with stronger impact:\n\n\
     • Architected and deployed cloud-native infrastructure on AWS supporting 500K+ daily transactions with 99.99% reliability\n\
     • Optimized database queries and implemented Redis caching strategy, achieving 50% reduction in API response times\n\
     • Led agile development practices and collaborated with product team to deliver 3 major features ahead of schedule, increasing user engagement by 35%\n\n\
     Improvements:\n\
     ✓ Quantified achievements with specific metrics\n\
     ✓ Demonstrated technical expertise\n\
     ✓ Showed leadership and collaboration skills\n\
     ✓ Connected work to business outcomes",
    "Professional enhancement:\n\n\
     • Drove end-to-end product development for customer-facing web application used by 100K+ monthly active users\n\
     • Reduced system downtime by 80% through implementation of robust monitoring, alerting, and automated recovery systems\n\
     • Delivered high-impact features that contributed to $2M increase in annual recurring revenue through improved user experience\n\n\
     Changes made:\n\
     ✓ Focused on outcomes rather than tasks\n\
     ✓ Added financial impact\n\
     ✓ Included scale and scope\n\
     ✓ Used compelling action verbs",
];

const ATS_NARRATIVES: &[&str] = &["Strengths:\n\
     • Clear section headings and professional formatting\n\
     • Quantified achievements with specific metrics\n\
     • Relevant technical skills properly highlighted\n\n\
     Specific recommendations:\n\
     1. Mirror the exact keywords from the posting in your experience section\n\
     2. Mention cross-functional leadership in your summary\n\
     3. Use the exact job title from the posting where it applies\n\
     4. Consider adding relevant certifications\n\n\
     Pro tips:\n\
     • Use standard fonts (Arial, Calibri, Times New Roman)\n\
     • Avoid headers, footers, images and complex formatting\n\
     • Include a skills section with exact keyword matches"];

const CHAT_IMPROVE: &[&str] = &[
    "To improve your bullet points, use the STAR method (Situation, Task, Action, Result). For example:\n\n\
     • Instead of: 'Worked on team projects'\n\
     • Write: 'Led cross-functional team of 5 developers to deliver customer portal, resulting in 40% faster user onboarding'\n\n\
     Always include quantifiable metrics and specific outcomes.",
    "Here are key improvements for your resume:\n\n\
     1. Start with strong action verbs (Led, Implemented, Optimized)\n\
     2. Add specific numbers and percentages\n\
     3. Focus on achievements, not just responsibilities\n\
     4. Use industry-relevant keywords\n\n\
     Example: 'Managed social media' → 'Developed social media strategy that increased engagement by 65% and grew followers from 2K to 15K in 6 months'",
];

const CHAT_SUMMARY: &[&str] = &["Here's a formula for a compelling professional summary:\n\n\
     [Years of experience] + [Key expertise] + [Notable achievement] + [What you bring to employers]\n\n\
     Example: 'Results-driven software engineer with 5+ years developing scalable web applications. Led migration of legacy system serving 100K+ users, reducing load times by 60%. Passionate about creating user-centric solutions that drive business growth.'"];

const CHAT_TAILOR: &[&str] = &["To tailor your resume for software engineering:\n\n\
     1. Match technical skills to job requirements\n\
     2. Highlight relevant projects and frameworks\n\
     3. Use exact keywords from job posting\n\
     4. Emphasize problem-solving and system design experience\n\
     5. Include metrics on performance improvements\n\n\
     Prioritize experiences that show coding ability, teamwork, and technical leadership."];

const CHAT_GENERAL: &[&str] = &[
    "Based on your question, I recommend focusing on quantifiable achievements in your resume. Instead of saying 'Led a team', say 'Led a team of 5 engineers to deliver a project that increased efficiency by 30%'. Numbers and specific impacts make your resume stand out.",
    "For a strong resume, remember the 3 C's: Clear, Concise, and Compelling. Use bullet points, keep descriptions to 2-3 lines, and always lead with your strongest achievements. Tailor each application to the specific role.",
    "To make your resume ATS-friendly: Use standard section headings, include relevant keywords, avoid complex formatting, and save as PDF unless otherwise specified. Focus on skills that match the job description.",
];

#[derive(Debug, Clone, Default)]
pub struct CannedGenerator {
    latency: Duration,
}

impl CannedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slow backend for exercising callers that stop waiting.
    #[cfg(test)]
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    fn replies_for(prompt: &str) -> &'static [&'static str] {
        if prompt.starts_with(IMPROVE_LEAD) {
            return IMPROVEMENTS;
        }
        if prompt.starts_with(ATS_LEAD) {
            return ATS_NARRATIVES;
        }
        let lower = prompt.to_lowercase();
        if ["improve", "bullet", "better"].iter().any(|w| lower.contains(w)) {
            CHAT_IMPROVE
        } else if ["summary", "professional"].iter().any(|w| lower.contains(w)) {
            CHAT_SUMMARY
        } else if ["tailor", "software", "engineer"].iter().any(|w| lower.contains(w)) {
            CHAT_TAILOR
        } else {
            CHAT_GENERAL
        }
    }
}

fn pick(replies: &[&str]) -> String {
    replies
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _system: &str,
        _max_output_tokens: u32,
    ) -> Result<String, LlmError> {
        let reply = pick(Self::replies_for(prompt));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(reply)
    }

    fn backend(&self) -> &'static str {
        "canned"
    }
}

/// Always fails; stands in for an unreachable backend.
#[cfg(test)]
pub struct FailingGenerator;

#[cfg(test)]
#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _: &str, _: &str, _: u32) -> Result<String, LlmError> {
        Err(LlmError::Unavailable("backend unreachable".into()))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}
