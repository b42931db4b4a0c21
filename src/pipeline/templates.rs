//! Fixed literals the assembly pipeline keys on.
//!
//! Sections in the generated note are located by exact substring match on
//! these markers, never by structural parsing. Changing any literal here
//! breaks marker detection against previously generated documents.

/// Stands in for any input section the clinician left empty.
pub const NOT_PROVIDED: &str = "Not provided.";

/// Sentinel the generation service writes into sections it had no data for.
pub const MISSING_INFO_SENTINEL: &str = "NO INFORMATION FOUND";

/// Placeholder in the main note body where the diagnostic assessment is spliced in.
pub const ASSESSMENT_PLACEHOLDER: &str =
    "[YOUR SEPARATELY GENERATED DETAILED MEDICAL EXPLANATION AND PLAN WILL BE INSERTED HERE BY THE SCRIPT]";

/// Delimits the candidate checklist inside the generated note body.
pub const CHECKLIST_START_MARKER: &str = "--- Alzheimer's Disease Candidate Checklist ---";
pub const CHECKLIST_END_MARKER: &str = "--- (End Checklist Template) ---";

/// Generic criteria heading replaced by the patient-specific elaboration.
pub const GENERIC_CRITERIA_HEADING: &str = "### Supporting Criteria from Diagnostic Algorithm";

/// Heading of the patient-specific criteria elaboration section.
pub const ELABORATION_HEADING: &str =
    "### Patient-Specific Elaboration of Diagnostic Criteria for Alzheimer's Disease";

/// Heading of the literature summary section.
pub const LITERATURE_HEADING: &str = "### Recent Literature Summary";

/// Heading of the assessment fragment.
pub const ASSESSMENT_HEADING: &str = "## Medical Explanation";

/// Heading of the missing-information summary section.
pub const MISSING_SUMMARY_HEADING: &str = "## Summary of Missing Information";

/// Clean (unfilled) checklist template sent for dynamic population.
///
/// The `***` placeholders and `No / YES / UNKNOWN` options are filled by the
/// generation service from patient data; items without data keep the
/// placeholder untouched.
pub const CHECKLIST_TEMPLATE: &str = r#"--- Alzheimer's Disease Candidate Checklist ---
<INCLUSION CRITERIA>
1- Age between 50 - 90 years: ***
2- Cognitive Status (MCI or Mild Dementia due to AD): ***
3- Biomarker Evidence (Amyloid PET or CSF positive for beta Amyloid): ***
4- MMSE Score > 19: ***
Overall Inclusion Criteria Met: *** (YES/NO/UNCERTAIN based on items 1-4)
</INCLUSION CRITERIA>

<OTHER DATA - include ONLY if INCLUSION CRITERIA SATISFIED or UNCERTAIN>
- MMSE score: ***/30 (Subsection scores: ***)
- MoCA score: ***/30 (Subsection scores: ***)
- CDR-global: *** (Subsection scores: ***)
- FAQ score: ***/30 (Subsection scores: ***)
- Baseline Labs (CBC, CMP, TSH, B12, Folate, Vit D, INR, aPTT): ***
- APOE Genotype: *** (e.g., e3/e3, e3/e4, e4/e4, or "Not available" or "To be ordered")
- Associated ARIA Risk (if APOE known and applicable): ***
</OTHER DATA>

<EXCLUSION CRITERIA - include ONLY if INCLUSION CRITERIA SATISFIED or UNCERTAIN>
For each item, select "No" (not excluded), "YES" (excluded), or "UNKNOWN" (insufficient information).

No / YES / UNKNOWN : Other physical, mental, or neurological issue significantly contributing to cognitive impairment.
No / YES / UNKNOWN : Age outside 50 - 90 years. (Actual Age: ***)
No / YES / UNKNOWN : MRI contraindication.
No / YES / UNKNOWN : MRI evidence of exclusionary neurological abnormalities (>4 microhemorrhages, superficial siderosis, vasogenic edema, recent strokes, aneurysms, vascular malformations, extensive white matter disease, neoplasms, infections).
No / YES / UNKNOWN : Bleeding risks (untreated bleeding disorder, platelets < 50, INR > 1.5, or current anticoagulation).
No / YES / UNKNOWN : Active oncological condition (unless prolonged remission at physician discretion).
No / YES / UNKNOWN : Unstable mental health conditions or GDS > 8. (GDS Score: ***/15)
No / YES / UNKNOWN : Ongoing substance dependency.
No / YES / UNKNOWN : Currently pregnant or lactating. (If N/A, state N/A)
No / YES / UNKNOWN : BMI outside range 17-35. (Estimated BMI: *** kg/m²)
No / YES / UNKNOWN : Diagnosed systemic immunological disorder.
No / YES / UNKNOWN : Positive HIV status (if unknown and high risk, needs test).
No / YES / UNKNOWN : Stroke, seizure, or TIA within the last year, or late-life onset seizure.
No / YES / UNKNOWN : Current use of systemic monoclonal antibodies, immunoglobulin, or other biological treatments.

Overall Exclusion Criteria Summary: ***
</EXCLUSION CRITERIA>
--- (End Checklist Template) ---"#;

/// Fixed signature block appended to every note.
pub const SIGNATURE: &str = "\
Division of Cognitive and Behavioral Neurology
Memory Disorders Clinic
Department of Neurology
University Medical Center";
