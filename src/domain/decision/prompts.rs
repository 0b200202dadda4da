//! Prompt builders for the two model calls.

use super::QUESTION_COUNT;

/// Prompt asking for the clarification questions.
pub fn question_prompt(statement: &str) -> String {
    format!(
        "You are a senior decision-making expert.\n\
         \n\
         User decision:\n\
         \"{statement}\"\n\
         \n\
         Generate EXACTLY {count} follow-up questions to evaluate\n\
         whether this decision is good or bad.\n\
         \n\
         Rules:\n\
         - Questions must be specific to the decision\n\
         - Cover money, feasibility, risks, alternatives, timeline, backup\n\
         - Output ONLY numbered questions (1-{count})\n",
        statement = statement,
        count = QUESTION_COUNT,
    )
}

/// Prompt asking for the scored verdict.
pub fn verdict_prompt(statement: &str, answers: &[String], context: &str) -> String {
    let numbered = answers
        .iter()
        .enumerate()
        .map(|(i, a)| format!("{}. {}", i + 1, a))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Decision Problem:\n\
         {statement}\n\
         \n\
         User Answers:\n\
         {numbered}\n\
         \n\
         Relevant Real-World Information:\n\
         {context}\n\
         \n\
         You are a STRICT decision evaluator.\n\
         \n\
         Step 1: Rate each factor from 0 to 10\n\
         - Financial feasibility\n\
         - Risk level (10 = very risky)\n\
         - Practicality\n\
         - Backup/fallback strength\n\
         - Timeline realism\n\
         \n\
         Step 2: Apply these rules STRICTLY:\n\
         - If financial feasibility < 4 -> Decision is NOT GOOD\n\
         - If risk level > 7 AND no strong backup -> NOT GOOD\n\
         - If 2 or more factors score below 4 -> NOT GOOD\n\
         - If all factors >= 6 -> GOOD\n\
         - Else -> CONDITIONALLY GOOD\n\
         \n\
         Step 3: Respond ONLY in this format:\n\
         \n\
         Scores:\n\
         - Financial feasibility: X/10\n\
         - Risk level: X/10\n\
         - Practicality: X/10\n\
         - Backup strength: X/10\n\
         - Timeline realism: X/10\n\
         \n\
         Decision Verdict:\n\
         Good / Not Good / Conditionally Good\n\
         \n\
         Reasoning:\n\
         - Bullet points\n\
         \n\
         Risks:\n\
         - Bullet points\n\
         \n\
         Expert Suggestions:\n\
         - Bullet points\n",
        statement = statement,
        numbered = numbered,
        context = context,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_prompt_embeds_statement_and_count() {
        let prompt = question_prompt("Should I buy a house?");
        assert!(prompt.contains("\"Should I buy a house?\""));
        assert!(prompt.contains("EXACTLY 6 follow-up questions"));
        assert!(prompt.contains("numbered questions (1-6)"));
        assert!(prompt.contains("money, feasibility, risks, alternatives, timeline, backup"));
    }

    #[test]
    fn verdict_prompt_numbers_answers_and_includes_context() {
        let answers = vec!["$5,000".to_string(), "six months".to_string()];
        let prompt = verdict_prompt("Quit my job?", &answers, "No external data available (offline)");
        assert!(prompt.contains("Decision Problem:\nQuit my job?"));
        assert!(prompt.contains("User Answers:\n1. $5,000\n2. six months\n"));
        assert!(prompt.contains("No external data available (offline)"));
    }

    #[test]
    fn verdict_prompt_fixes_section_order() {
        let prompt = verdict_prompt("x", &[], "");
        let order = ["Scores:", "Decision Verdict:", "Reasoning:", "Risks:", "Expert Suggestions:"];
        let positions: Vec<usize> = order.iter().map(|s| prompt.rfind(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
