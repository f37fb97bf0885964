//! Research Prompts
//!
//! Prompt templates use `[PRODUCT]` and `[NICHE]` placeholder tokens that are
//! substituted verbatim by [`build_prompt`].

pub const PRODUCT_TOKEN: &str = "[PRODUCT]";
pub const NICHE_TOKEN: &str = "[NICHE]";

/// Substituted for `[NICHE]` when the job has no niche
pub const DEFAULT_NICHE: &str = "this market";

/// Single-phase prompt: one broad direct-response research pass
pub const MARKET_RESEARCH_PROMPT: &str = r#"You are a direct response market researcher. Conduct deep research on [PRODUCT] in the [NICHE] market.

Find as many as possible for each category:

- Pain points & fears (with verbatim customer quotes and sources)
- Desires & goals (with quotes)
- Objections & hesitations (with quotes)
- Emotional drivers
- Identity shifts (who they want to become)
- Current beliefs about the problem
- Trigger events that make them search for solutions
- Buying criteria they use to evaluate options
- Relationships & influences (who they trust, communities they're part of, authorities they follow)
- Competitor mentions & complaints
- Demographics (age, gender, income, location, life stage)
- Psychographics (values, lifestyle, personality traits)
- Potential ad angles

For each item, include:
- The insight
- A verbatim quote if available
- Source URL

Organize findings by awareness level where applicable:
- Unaware (don't know they have a problem)
- Problem-aware (know the problem, not the solutions)
- Solution-aware (know solutions exist, comparing options)
- Product-aware (know this product, not convinced)
- Most-aware (ready to buy, need final push)

Be thorough. Quality over arbitrary counts.

Product: [PRODUCT]
Niche: [NICHE]"#;

/// Dual-phase, phase 1: emotional and behavioral research
pub const BEHAVIORAL_PROMPT: &str = r#"You are an elite direct response market researcher trained in the methods of Gary Halbert, Eugene Schwartz, Dan Kennedy, and John Carlton. Conduct exhaustive research on [PRODUCT] in the [NICHE] market.

Find as many as possible for each category:

CORE RESEARCH:
- Pain points & fears (with verbatim customer quotes and sources)
- Desires & goals (with quotes)
- Hidden desires (things they want but are embarrassed to admit: status, vanity, revenge, proving others wrong, sexual desirability, feeling younger)
- Objections & hesitations (with quotes)
- Emotional drivers (the feelings that push them to act)
- Identity shifts (who they are now vs. who they want to become)
- Current beliefs about the problem
- The villain (who or what do they blame for their situation?)

BUYING BEHAVIOR:
- Trigger events that make them search NOW (life events, seasons, health scares, relationships, milestones)
- Failed solutions (what have they already tried that didn't work? Why did it fail?)
- Buying criteria (how do they evaluate options? What features matter?)
- Decision timeline (how long do they research before buying?)
- Price anchors (what have they paid for similar things? What feels "expensive" vs "cheap"?)
- Proof preferences (what evidence convinces them: testimonials, studies, before/afters, credentials, celebrity?)
- Risk perception (what's the worst case they imagine? What makes them hesitate at checkout?)
- Spouse/influencer objections (what would their partner, friends, doctor, or family say?)

LANGUAGE & VOICE:
- Exact language patterns (specific recurring words, phrases, slang they use)
- How they describe the problem in their own words
- How they describe success/the dream outcome in their own words
- Emotional vocabulary (the feeling words they use)
- Metaphors and analogies they use

MARKET INTELLIGENCE:
- Competitor mentions & specific complaints (what do they hate about existing solutions?)
- Success stories they admire (who has solved this that they look up to?)
- Where they research (Reddit, YouTube, Amazon reviews, Facebook groups, TikTok, forums, blogs)
- Influencers and authorities they trust
- Communities they belong to

CUSTOMER LIFECYCLE INSIGHTS:
- Competitor customers (why did they choose the competitor? What do they complain about with that choice?)
- Repeat buyer triggers (what makes someone buy again? What keeps them loyal?)
- Churn reasons (why do people stop using solutions like this? Why do they quit?)
- Referral language (how do happy customers describe this to friends and family?)
- Upsell desires (what else do they want after solving the initial problem?)
- Post-purchase regrets (buyer's remorse triggers, what makes them return products or cancel?)

STRATEGIC OUTPUT:
- Potential ad angles (hook concepts based on the research)
- Potential headlines (based on exact customer language)
- Potential proof elements (what claims can be supported with evidence found?)
- Potential offers (what would be irresistible based on their desires and fears?)
- Potential guarantees (what would eliminate their specific risk perception?)

For each item, include:
- The insight
- A verbatim quote if available
- Source URL

Organize findings by awareness level AND customer stage:

AWARENESS LEVELS (pre-purchase):
- Unaware (don't know they have a problem)
- Problem-aware (know the problem, not the solutions)
- Solution-aware (know solutions exist, comparing options)
- Product-aware (know this specific product, not yet convinced)
- Most-aware (ready to buy, need final push or right offer)

CUSTOMER STAGES (post-purchase):
- New customers (just bought, what do they need to succeed?)
- Active customers (using it, what would make them buy more?)
- At-risk customers (showing signs of leaving, why?)
- Lost customers (left, what drove them away?)
- Advocates (raving fans, how do they sell it for you?)

Be exhaustive. Real customer language over marketing speak. Verbatim quotes over summaries. Depth over breadth. Find the weird, specific, emotional stuff that writes the ads."#;

/// Dual-phase, phase 2: demographic and psychographic profiling per segment
pub const DEMOGRAPHIC_PROMPT: &str = r#"For [PRODUCT] in the [NICHE] market, provide demographic and psychographic profiles mapped to each customer segment:

For EACH segment below, tell me WHO they are:

PRE-PURCHASE AWARENESS LEVELS:
1. Unaware - who doesn't realize this is their problem?
2. Problem-Aware - who knows they have the problem but doesn't know solutions exist?
3. Solution-Aware - who is actively comparing options?
4. Product-Aware - who knows about this product or similar products?
5. Most-Aware - who is ready to buy?

POST-PURCHASE STAGES:
6. New Customers
7. Repeat Customers
8. At-Risk (might leave)
9. Lost Customers
10. Advocates

FOR EACH SEGMENT, provide:
- Age range
- Income level
- Race/ethnicity breakdown (cite medical studies if available)
- Life stage (postpartum, perimenopausal, menopausal, post-hysterectomy, on BC, etc.)
- Geographic patterns
- Where they research online (specific subreddits, forums, sites)
- Health philosophy (natural vs. pharmaceutical)
- What influences their decisions (doctors, peers, influencers)
- Buying criteria ranked by importance
- Churn reasons (for post-purchase segments)
- Conversion tactics that work for this segment

Also include:
- Total addressable market size
- Percentage who actively seek solutions
- Market growth trends
- Key platforms for reaching each segment
- Decision influence hierarchy (what actually drives purchases)

Include sources for all data."#;

/// Fill a prompt template for one product.
///
/// Every `[PRODUCT]` and `[NICHE]` token is replaced; a missing or blank niche
/// becomes [`DEFAULT_NICHE`]. A non-blank description is appended as its own
/// paragraph. Input text is passed through untouched.
pub fn build_prompt(
    template: &str,
    product: &str,
    niche: Option<&str>,
    description: Option<&str>,
) -> String {
    let niche = niche
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(DEFAULT_NICHE);

    let prompt = template
        .replace(PRODUCT_TOKEN, product)
        .replace(NICHE_TOKEN, niche);

    match description.filter(|d| !d.trim().is_empty()) {
        Some(description) => format!("{prompt}\n\nProduct description: {description}"),
        None => prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_every_token() {
        let prompt = build_prompt(
            "[PRODUCT] for [NICHE]; again [PRODUCT] in [NICHE]",
            "Acme Widget",
            Some("home fitness"),
            None,
        );
        assert_eq!(prompt, "Acme Widget for home fitness; again Acme Widget in home fitness");
    }

    #[test]
    fn test_missing_niche_uses_default() {
        assert_eq!(build_prompt("[NICHE]", "x", None, None), "this market");
        assert_eq!(build_prompt("[NICHE]", "x", Some("  "), None), "this market");
    }

    #[test]
    fn test_description_appended_as_paragraph() {
        let prompt = build_prompt("Research [PRODUCT]", "Acme", None, Some("A foldable rower"));
        assert_eq!(prompt, "Research Acme\n\nProduct description: A foldable rower");
    }

    #[test]
    fn test_blank_description_is_omitted() {
        let prompt = build_prompt("Research [PRODUCT]", "Acme", None, Some(""));
        assert_eq!(prompt, "Research Acme");
    }

    #[test]
    fn test_input_text_is_not_sanitized() {
        let prompt = build_prompt("[PRODUCT]", "Acme \"Pro\" <v2> [NICHE]", Some("gyms"), None);
        // Tokens introduced by the product name are substituted too
        assert_eq!(prompt, "Acme \"Pro\" <v2> gyms");
    }

    #[test]
    fn test_templates_carry_both_tokens() {
        for template in [MARKET_RESEARCH_PROMPT, BEHAVIORAL_PROMPT, DEMOGRAPHIC_PROMPT] {
            assert!(template.contains(PRODUCT_TOKEN));
            assert!(template.contains(NICHE_TOKEN));

            let prompt = build_prompt(template, "Acme Widget", Some("home fitness"), None);
            assert!(!prompt.contains(PRODUCT_TOKEN));
            assert!(!prompt.contains(NICHE_TOKEN));
            assert!(prompt.contains("Acme Widget"));
        }
    }
}
