//! Triage prompt for Friedreich's Ataxia abstract classification.
//!
//! Contains the classification prompt (role, labels, definitions, few-shot
//! examples) and the example abstract offered to first-time users.

/// Placeholder replaced by the abstract text
pub const ABSTRACT_PLACEHOLDER: &str = "{abstract_text}";

/// Classification prompt template.
/// Placeholder: {abstract_text}, wrapped in a literal pair of braces.
///
/// The wording, label names and few-shot examples steer the model output and
/// must not be edited casually.
pub const TRIAGE_PROMPT_TEMPLATE: &str = r#"
You are a biomedical abstract triage assistant. I want you to classify PubMed abstracts into one of five categories. For each input, provide both a classification label and a brief reasoning statement.

Labels:

1. SkyClarys/Omaveloxolone
2. FA Mechanisms (Iron/Ferroptosis/ROS)
3. Other Drugs/Compounds Targeting Iron/Ferroptosis/ROS
4. General FA (Genetics/Clinical)
5. Irrelevant

---

The label definitions are as follows:
- SkyClarys/Omaveloxolone: Abstracts mentioning omaveloxolone (SkyClarys), bardoxolone methyl, or related analogs.
- FA Mechanisms: Abstracts about FA biology including frataxin deficiency, iron overload, mitochondrial dysfunction, oxidative stress, ROS, lipid peroxidation, ferroptosis, GPX4.
- Other Drugs/Compounds: Abstracts about non-omaveloxolone drugs or compounds that modulate ferroptosis, GPX4, iron chelation, lipid peroxidation, or mitochondrial antioxidant pathways, even if studied in other diseases or models (exclude NRF2/KEAP1 activators).
- General FA: Abstracts about FA genetics, prevalence, natural history, or clinical scales, without mechanistic or therapeutic depth.
- Irrelevant: Everything else.

---

Here are several few-shot examples:

Example 1
Input: "In a phase II trial of omaveloxolone in Friedreich’s ataxia, activation of NRF2 improved mFARS scores versus placebo."
Output (JSON only): {"label":"SkyClarys/Omaveloxolone","reason":"Omaveloxolone activates NRF2 and was tested in FA patients."}

Example 2
Input: "Frataxin deficiency causes mitochondrial iron accumulation and lipid peroxidation; GPX4 overexpression restored cell viability."
Output (JSON only): {"label":"FA Mechanisms (Iron/Ferroptosis/ROS)","reason":"FA model shows ferroptosis via iron overload and GPX4 rescue."}

Example 3
Input: "Ferrostatin-1, a ferroptosis inhibitor, prevented lipid peroxidation and neuronal loss in a mouse model of Parkinson’s disease."
Output (JSON only): {"label":"Other Drugs/Compounds Targeting Iron/Ferroptosis/ROS","reason":"Ferrostatin-1 blocks ferroptosis and lipid peroxidation, relevant for repurposing."}

---

Now classify this input and provide the output in this format and do not include additional information beyond what is asked in the JSON output:

Input: {{abstract_text}}

Output (JSON only):
"#;

/// Example abstract (ferroptosis review with an FA focus) prefilled in the UI
/// and used by `classify --example`.
pub const EXAMPLE_ABSTRACT: &str = "Ferroptosis is an iron-dependent form of regulated cell death, arising from the accumulation of lipid-based reactive oxygen species when glutathione-dependent repair systems are compromised. Lipid peroxidation, mitochondrial impairment and iron dyshomeostasis are the hallmark of ferroptosis, which is emerging as a crucial player in neurodegeneration. This review provides an analysis of the most recent advances in ferroptosis, with a special focus on Friedreich's Ataxia (FA), the most common autosomal recessive neurodegenerative disease, caused by reduced levels of frataxin, a mitochondrial protein involved in iron-sulfur cluster synthesis and antioxidant defenses. The hypothesis is that the iron-induced oxidative damage accumulates over time in FA, lowering the ferroptosis threshold and leading to neuronal cell death and, at last, to cardiac failure. The use of anti-ferroptosis drugs combined with treatments able to activate the antioxidant response will be of paramount importance in FA therapy, such as in many other neurodegenerative diseases triggered by oxidative stress.";

/// Build the classification prompt for one abstract.
///
/// The abstract is inserted as-is. Braces and quotes are not escaped, so an
/// abstract containing JSON-like text becomes part of the prompt verbatim.
pub fn build_prompt(abstract_text: &str) -> String {
    TRIAGE_PROMPT_TEMPLATE.replace(ABSTRACT_PLACEHOLDER, abstract_text)
}
