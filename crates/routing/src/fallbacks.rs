//! Fallback catalogue: literal, human-authored response texts keyed by
//! scenario.
//!
//! Content here is configuration, not logic. It is loaded once into the
//! binary and never mutated at runtime.

/// Reply to a bare greeting.
pub const GREETING_REPLY: &str =
    "Hello! I can help with MSc EDI admissions questions. What would you like to know?";

/// Reply to thanks/goodbye.
pub const THANKS_REPLY: &str = "You're welcome!";

/// Reply to praise.
pub const PRAISE_REPLY: &str = "Glad it helped!";

/// Redirect for questions about the similarly named MDes programme.
pub const MDES_REDIRECT: &str = "I only answer questions about the MSc Engineering Design & \
     Innovation (EDI) programme. For MDes (Master of Design in Integrated Design), please refer \
     to the official programme website.";

/// Nothing relevant was found in the indexed admissions material.
pub const NOT_FOUND: &str = "I can't find this in the MSc EDI admissions information I'm \
     currently using. If you rephrase your question, I may be able to help.";

/// Requirement question with inconclusive context.
pub const REQUIREMENT_GENERIC: &str = "I can't find a confirmed EDI-specific requirement \
     statement for this in my current sources. Admissions are usually assessed holistically \
     (academic background, projects/experience, and motivation).";

/// Suitability/profile questions when generation has nothing better.
pub const SUITABILITY: &str = "Candidates who tend to thrive in MSc Engineering Design & \
     Innovation (EDI) are typically curious about working across disciplines, comfortable with \
     ambiguity, and motivated to solve real-world problems through design and technology. The \
     programme suits people who enjoy collaboration and want to broaden beyond a single \
     discipline.";

/// Canned answer for programme start date questions.
pub const PROGRAMME_START: &str = "The MSc Engineering Design & Innovation (EDI) programme \
     typically has one intake per academic year, with classes starting in the second half of \
     the year (often around August). Please refer to your offer/enrolment instructions for the \
     confirmed start date.";

/// Asks the user to disambiguate what "intake" means.
pub const INTAKE_DISAMBIGUATION: &str = "When you say \"intake\", do you mean the **programme \
     start date** (when classes begin) or the **application period**?\n\n\
     - **Programme start date (intake):** when the cohort begins classes\n\
     - **Application period:** when you submit your application (often an Oct-Feb window)\n\n\
     Tell me which one you mean and I'll answer for MSc EDI.";

/// What happens when an offer is not accepted in time.
pub const OFFER_OUTCOME: &str = "If you do not accept the offer within the acceptance period \
     stated in your offer letter, the offer will typically lapse and you will not be enrolled \
     in MSc Engineering Design & Innovation (EDI). For any conditions (including fees), please \
     refer to your offer letter, as details can vary.";

/// Re-application in a later cycle.
pub const REAPPLICATION: &str = "Yes — you can apply again to MSc Engineering Design & \
     Innovation (EDI) in a later application cycle. Each cycle is assessed independently, and \
     it helps to strengthen your application with updated experience/projects.";

/// Whether a visa is needed at all.
pub const VISA_NEED: &str = "A student pass/visa is not usually part of the admissions \
     decision, but it may be required for enrolment if you are an international student. After \
     you accept an offer, NUS typically provides instructions for the student pass/visa \
     process.";

/// How the visa process works.
pub const VISA_PROCESS: &str = "Visa application is typically handled after you accept an \
     offer. NUS will usually provide official instructions for applying for a Student's Pass \
     through Singapore's immigration system. The exact steps depend on your nationality.";
