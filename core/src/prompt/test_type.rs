//! Test types and their static prompt data
//!
//! Each variant owns its required form fields (in template order), its
//! guidance block, and its user-message template.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::PromptError;

/// Standardized test a missed question comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    /// LSAT Logical Reasoning
    Lsat,
    /// SAT Math
    Sat,
    /// MCAT Critical Analysis and Reasoning Skills
    Mcat,
}

impl TestType {
    /// Every supported test type
    pub fn all() -> &'static [TestType] {
        &[TestType::Lsat, TestType::Sat, TestType::Mcat]
    }

    /// Lowercase wire name (`lsat`, `sat`, `mcat`)
    pub fn as_str(&self) -> &'static str {
        match self {
            TestType::Lsat => "lsat",
            TestType::Sat => "sat",
            TestType::Mcat => "mcat",
        }
    }

    /// Human-readable test name
    pub fn display_name(&self) -> &'static str {
        match self {
            TestType::Lsat => "LSAT Logical Reasoning",
            TestType::Sat => "SAT Math",
            TestType::Mcat => "MCAT CARS",
        }
    }

    /// Form fields substituted into the template, in declared order
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            TestType::Lsat => &[
                "stimulus",
                "question",
                "selectedAnswer",
                "correctAnswer",
                "rationale",
                "whyWrong",
            ],
            TestType::Sat => &[
                "problem",
                "choices",
                "selectedAnswer",
                "correctAnswer",
                "work",
                "stuck",
            ],
            TestType::Mcat => &[
                "passage",
                "question",
                "selectedAnswer",
                "correctAnswer",
                "reasoning",
                "notes",
            ],
        }
    }

    /// Test-specific guidance appended to the persona block
    pub fn guidance(&self) -> &'static str {
        match self {
            TestType::Lsat => LSAT_GUIDANCE,
            TestType::Sat => SAT_GUIDANCE,
            TestType::Mcat => MCAT_GUIDANCE,
        }
    }

    /// User-message template with `{field}` slots
    pub fn template(&self) -> &'static str {
        match self {
            TestType::Lsat => LSAT_TEMPLATE,
            TestType::Sat => SAT_TEMPLATE,
            TestType::Mcat => MCAT_TEMPLATE,
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestType {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lsat" => Ok(TestType::Lsat),
            "sat" => Ok(TestType::Sat),
            "mcat" => Ok(TestType::Mcat),
            _ => Err(PromptError::UnknownTestType(s.to_string())),
        }
    }
}

const LSAT_GUIDANCE: &str = "You are analyzing LSAT Logical Reasoning questions.

Response Structure:
- **Question Type**: Identify the specific question type and modifier (e.g., \"Strengthen\", \"Weaken\", \"Must-Except\", \"Parallel-Principle\").
- **Question Difficulty**: Subjectively rate the difficulty of the question (1-5 stars).
- **Initial Observation**: What you notice about their reasoning approach. This is not a chance to congratulate them on what they did right; point out the part of their thought process that is relevant to the error.
- **Key Question**: ONE clarifying question about their thought process, if it is relevant. Skip this step when the error is purely one of reading comprehension.
- **Pattern Alert**: If you spot a common error pattern, name it constructively.
- **Adjustment**: A concrete suggestion for what to examine or reframe so they can see the error in their thinking. Make it actionable and specific to this question, not a general tip.

Common LSAT LR error patterns to watch for:
- Confusing necessity and sufficiency in conditional logic
- Missing scope shifts between the stimulus and the answer choices
- Falling for the strength of assertions (extreme language, absolutes)
- Misidentifying the conclusion or the premises of an argument
- Mistaking an intermediate conclusion for the main conclusion
- Overlooking conditional reversals (if A then B is not if B then A)
- Shell-game answer choices that reuse stimulus language but change its meaning
- Opposite answer choices that are true but do not answer the question
- Confusing strengthen/weaken questions with assumption questions

LSAT-specific guidance:
- The stimulus contains an argument with premises and a conclusion
- Question stems are precise: \"most vulnerable to criticism\" differs from \"assumption\"
- Wrong answers often contain elements of the stimulus but shift scope
- Encourage prephrasing the answer in their own words where the question allows it
- Correct answers must be 100% defensible from the text";

const SAT_GUIDANCE: &str = "You are analyzing SAT Math questions.

Common SAT Math error patterns to watch for:
- Sign errors and mistakes with negative numbers
- Misreading what the question actually asks for (finding x vs. 2x)
- Correct calculation but the wrong unit or form (decimal vs. fraction)
- Algebraic manipulation errors (distribution, combining like terms)
- Rushing through \"easy\" problems and making careless errors
- Setting up equations correctly but solving them incorrectly

SAT Math-specific guidance:
- Distinguish conceptual misunderstandings from computational errors
- Check whether they understood the problem setup or made an execution error
- Look for whether they knew the method but misapplied it
- Consider time pressure: did they skip steps?";

const MCAT_GUIDANCE: &str = "You are analyzing MCAT CARS (Critical Analysis and Reasoning Skills) questions.

Common MCAT CARS error patterns to watch for:
- Bringing in outside knowledge instead of reasoning purely from the passage
- Missing the author's tone, stance, or attitude toward the subject
- Confusing \"could be true\" with \"must be true\" based on the passage
- Selecting answers that are true but do not answer the question
- Missing subtle qualifiers (some, most, all, typically, usually)
- Making inferences beyond what the passage supports

MCAT CARS-specific guidance:
- Everything must be defensible from the passage text
- The author's purpose and tone matter as much as the content
- Questions test reading precision, not background knowledge
- The correct answer often hinges on a single word or qualifier";

const LSAT_TEMPLATE: &str = "Analyze this LSAT LR wrong answer:
STIMULUS: {stimulus}

QUESTION & ANSWERS: {question}

USER SELECTED: {selectedAnswer}
CORRECT ANSWER: {correctAnswer}

USER'S RATIONALE: {rationale}

USER'S SELF-DIAGNOSIS: {whyWrong}";

const SAT_TEMPLATE: &str = "Analyze this SAT Math wrong answer:

PROBLEM: {problem}

ANSWER CHOICES: {choices}

STUDENT SELECTED: {selectedAnswer}
CORRECT ANSWER: {correctAnswer}

STUDENT'S WORK: {work}

WHERE STUDENT GOT STUCK: {stuck}

Guide them using your pedagogical framework and the SAT Math-specific patterns above.";

const MCAT_TEMPLATE: &str = "Analyze this MCAT CARS wrong answer:

PASSAGE: {passage}

QUESTION & ANSWERS: {question}

STUDENT SELECTED: {selectedAnswer}
CORRECT ANSWER: {correctAnswer}

STUDENT'S REASONING: {reasoning}

PASSAGE COMPREHENSION NOTES: {notes}

Guide them using your pedagogical framework and the MCAT CARS-specific patterns above.";
