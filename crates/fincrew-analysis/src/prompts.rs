//! Prompt templates for the analysis pipelines
//!
//! Templates are rendered with minijinja. Each pipeline gets one task
//! template; participants' role descriptions live with the team builders.

use crate::error::Result;
use minijinja::{Environment, context};

const BATCH_ANALYSIS: &str = "\
Currently processing records {{ start }} to {{ end }} (out of {{ total }}).
Here is the data for this batch:
{{ data }}
Please analyze the given market data and provide a comprehensive investment analysis. \
Specifically, focus on the following aspects:
  1. Identify key factors driving growth or decline over the given period, including \
macroeconomic trends, monetary policy, inflation, and geopolitical events.
  2. Ask the web_surfer to search external sources for major economic events, government \
policies, and global financial trends that influenced the market, such as interest rate \
changes, fiscal stimulus, supply chain disruptions, or major corporate earnings reports, \
and integrate these findings into the analysis.
  3. Provide an asset allocation strategy based on the historical performance and risk \
profile of different industry sectors. Consider factors such as sector rotation, market \
cycles, and risk-adjusted returns.
  4. Assess potential risks associated with investing in specific industries or assets, \
explaining why these risks exist. Consider economic downturns, regulatory changes, global \
crises, or sector-specific vulnerabilities.
  5. Provide a market sentiment assessment covering investor mood, market outlook, and the \
major factors that could impact future investment decisions.
All participants should collaborate to deliver a thorough and valuable investment analysis, \
ensuring that recommendations are well-supported by data and market insights.";

const DIALOGUE_SCORING: &str = "\
You are an academic-discussion analysis expert. Evaluate each transcript below against \
these coding items:
{% for item in items %}- {{ item }}
{% endfor %}
Score an item \"1\" when the behavior is clearly present in the transcript and leave it \
empty otherwise.

Reply with one JSON object per transcript, in transcript order, separating consecutive \
objects with the following delimiter line:
{{ delimiter }}
For example:
```json
{ {% for item in items %}\"{{ item }}\": \"\"{% if not loop.last %}, {% endif %}{% endfor %} }
{{ delimiter }}
{...}
```

Transcripts (separated by the same delimiter):
{{ transcripts }}";

const REPORT_TASK: &str = "\
Write a complete, in-depth investment research report for ticker {{ ticker }}.
Start by organizing the company profile, the industry overview, and recent news, and \
integrate the internal financial indicators with external information. Requirements:

1. Ask the news_analyst to search external sources for the company's basic information, \
including its profile, main products, and key customers and partners, plus an industry \
overview including the company's sector and its competitors.
2. Based on the following financial indicators:
{{ indicators }}
explain the company's financial condition in depth, covering financial ratios, revenue \
changes, cost structure, and profitability. Present this as a paragraph of roughly 300 \
words summarizing its financial strengths.
3. Ask the news_analyst to gather 3-5 significant news items about the company from the \
past three to six months, covering business expansion or contraction, product updates, \
partnerships, policy impacts, and macro or geopolitical factors with potential effects on \
the company.

Every participant must contribute to the overall report and avoid repeating content.";

const SUMMARY_CLEANUP: &str = "\
You will receive investment-analysis content produced by AI participants. It may contain \
raw instructions, verbose narration, duplicated information, or inconsistent formatting. \
Clean it up, reorganize it, and return the content as bullet lists stored under bracketed \
section tags so it can be used directly in a formal report.

Return these five sections and keep the headings unchanged:
[Company Profile]: bullet points covering the company's background, main products and \
services, business model, regions, and key customers and partners.
[Industry Overview]: bullet points covering the company's industry, market trends, and \
competitors.
[Financial Summary]: consolidated information on financial indicators, revenue, profit, \
ratios, and cash flow.
[News Digest]: a bullet list of significant company news (format: - headline: summary).
[Recommendation]: an explicit Buy, Hold, or Sell call with the reasoning, including \
short- and long-term growth potential and risk, financial soundness and competitiveness, \
market sentiment and valuation, and external opportunities and threats.

Return only the reorganized content.

Original content:
{{ content }}";

/// Rendered prompt templates for all pipelines
pub struct PromptSet {
    env: Environment<'static>,
}

impl PromptSet {
    /// Compile the built-in templates
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("batch_analysis", BATCH_ANALYSIS)?;
        env.add_template("dialogue_scoring", DIALOGUE_SCORING)?;
        env.add_template("report_task", REPORT_TASK)?;
        env.add_template("summary_cleanup", SUMMARY_CLEANUP)?;
        Ok(Self { env })
    }

    /// Task prompt for one market-analysis batch
    pub fn batch_analysis(
        &self,
        start: usize,
        end: usize,
        total: usize,
        data: &str,
    ) -> Result<String> {
        Ok(self
            .env
            .get_template("batch_analysis")?
            .render(context! { start, end, total, data })?)
    }

    /// Instruction prompt for one dialogue-scoring batch
    pub fn dialogue_scoring(
        &self,
        items: &[&str],
        delimiter: &str,
        transcripts: &str,
    ) -> Result<String> {
        Ok(self
            .env
            .get_template("dialogue_scoring")?
            .render(context! { items, delimiter, transcripts })?)
    }

    /// Task prompt for the full research-report team run
    pub fn report_task(&self, ticker: &str, indicators: &str) -> Result<String> {
        Ok(self
            .env
            .get_template("report_task")?
            .render(context! { ticker, indicators })?)
    }

    /// Cleanup prompt that reorganizes raw turns into tagged sections
    pub fn summary_cleanup(&self, content: &str) -> Result<String> {
        Ok(self
            .env
            .get_template("summary_cleanup")?
            .render(context! { content })?)
    }
}
