//! Built-in starter catalog
//!
//! Twenty concepts across science, math, language and classroom
//! management, each with multilingual synonym sets and descriptions
//! where available, plus a dozen sample content items. `apply` is
//! idempotent: a concept already in the store is skipped whole, and
//! content dedupes by URL, so re-seeding an existing database adds
//! nothing.

use chrono::Utc;
use sahaya_common::models::{Concept, ContentItem, SourceType};
use sahaya_common::{Language, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{concepts, content, synonyms};

use Language::{En, Hi, Kn};

struct SeedConcept {
    id: &'static str,
    subject: &'static str,
    description_en: &'static str,
    description_hi: Option<&'static str>,
    description_kn: Option<&'static str>,
    grade: &'static str,
    synonyms: &'static [(Language, &'static str)],
}

struct SeedContent {
    concept_id: &'static str,
    subject: &'static str,
    title: &'static str,
    description: &'static str,
    content_type: &'static str,
    language: Language,
    content_url: &'static str,
    source_type: SourceType,
    is_verified: bool,
}

const CATALOG: &[SeedConcept] = &[
    SeedConcept {
        id: "SCI_BIO_PHOTOSYNTHESIS",
        subject: "science",
        description_en: "Process by which plants make food using sunlight",
        description_hi: Some("पौधे सूर्य की रोशनी से भोजन कैसे बनाते हैं"),
        description_kn: Some("ಸಸ್ಯಗಳು ಸೂರ್ಯನ ಬೆಳಕಿನಿಂದ ಆಹಾರ ತಯಾರಿಸುವ ಪ್ರಕ್ರಿಯೆ"),
        grade: "7",
        synonyms: &[
            (En, "photosynthesis"),
            (En, "plant food making"),
            (En, "how plants make food"),
            (Kn, "ದ್ಯುತಿಸಂಶ್ಲೇಷಣೆ"),
            (Kn, "ಸಸ್ಯಗಳ ಆಹಾರ ತಯಾರಿಕೆ"),
            (Hi, "प्रकाश संश्लेषण"),
            (Hi, "पौधों का भोजन बनाना"),
        ],
    },
    SeedConcept {
        id: "MATH_FRACTIONS",
        subject: "math",
        description_en: "Parts of a whole number",
        description_hi: Some("पूर्ण संख्या के भाग"),
        description_kn: Some("ಪೂರ್ಣ ಸಂಖ್ಯೆಯ ಭಾಗಗಳು"),
        grade: "5",
        synonyms: &[
            (En, "fractions"),
            (En, "parts of whole"),
            (Kn, "ಭಿನ್ನರಾಶಿ"),
            (Kn, "ಭಾಗಗಳು"),
            (Hi, "भिन्न"),
            (Hi, "अंश"),
        ],
    },
    SeedConcept {
        id: "CLASSROOM_ATTENTION",
        subject: "pedagogy",
        description_en: "Getting and maintaining student attention",
        description_hi: Some("छात्रों का ध्यान आकर्षित करना"),
        description_kn: Some("ವಿದ್ಯಾರ್ಥಿಗಳ ಗಮನ ಸೆಳೆಯುವುದು"),
        grade: "all",
        synonyms: &[
            (En, "student attention"),
            (En, "classroom attention"),
            (En, "students not listening"),
            (En, "distracted students"),
            (Kn, "ವಿದ್ಯಾರ್ಥಿಗಳ ಗಮನ"),
            (Kn, "ಮಕ್ಕಳ ಗಮನ"),
            (Kn, "ಮಕ್ಕಳು ಕೇಳುತ್ತಿಲ್ಲ"),
            (Hi, "छात्रों का ध्यान"),
            (Hi, "बच्चे नहीं सुन रहे"),
        ],
    },
    SeedConcept {
        id: "CLASSROOM_DISCIPLINE",
        subject: "pedagogy",
        description_en: "Managing classroom behavior",
        description_hi: Some("कक्षा में अनुशासन बनाए रखना"),
        description_kn: Some("ತರಗತಿಯಲ್ಲಿ ಶಿಸ್ತು ನಿರ್ವಹಣೆ"),
        grade: "all",
        synonyms: &[
            (En, "discipline"),
            (En, "classroom management"),
            (En, "student behavior"),
            (En, "misbehaving students"),
            (Kn, "ಶಿಸ್ತು"),
            (Kn, "ತರಗತಿ ನಿರ್ವಹಣೆ"),
            (Hi, "अनुशासन"),
            (Hi, "कक्षा प्रबंधन"),
        ],
    },
    SeedConcept {
        id: "SCI_PHY_MOTION",
        subject: "science",
        description_en: "Movement of objects and forces",
        description_hi: Some("वस्तुओं की गति और बल"),
        description_kn: Some("ವಸ್ತುಗಳ ಚಲನೆ ಮತ್ತು ಬಲ"),
        grade: "8",
        synonyms: &[
            (En, "motion"),
            (En, "movement"),
            (En, "forces and motion"),
            (Kn, "ಚಲನೆ"),
            (Kn, "ಬಲ ಮತ್ತು ಚಲನೆ"),
            (Hi, "गति"),
            (Hi, "बल और गति"),
        ],
    },
    SeedConcept {
        id: "LANG_READING_COMPREHENSION",
        subject: "language",
        description_en: "Understanding written text",
        description_hi: Some("लिखित पाठ को समझना"),
        description_kn: Some("ಬರಹವನ್ನು ಅರ್ಥಮಾಡಿಕೊಳ್ಳುವುದು"),
        grade: "all",
        synonyms: &[
            (En, "reading comprehension"),
            (En, "understanding text"),
            (En, "students cant read"),
            (Kn, "ಓದುವ ಗ್ರಹಿಕೆ"),
            (Kn, "ಮಕ್ಕಳು ಓದಲು ಸಾಧ್ಯವಿಲ್ಲ"),
            (Hi, "पढ़ने की समझ"),
            (Hi, "बच्चे पढ़ नहीं सकते"),
        ],
    },
    SeedConcept {
        id: "MATH_MULTIPLICATION",
        subject: "math",
        description_en: "Multiplying numbers",
        description_hi: Some("संख्याओं का गुणा"),
        description_kn: Some("ಸಂಖ್ಯೆಗಳ ಗುಣಾಕಾರ"),
        grade: "4",
        synonyms: &[
            (En, "multiplication"),
            (En, "times tables"),
            (En, "multiply"),
            (Kn, "ಗುಣಾಕಾರ"),
            (Kn, "ಮಗ್ಗಿ"),
            (Hi, "गुणा"),
            (Hi, "पहाड़े"),
        ],
    },
    SeedConcept {
        id: "CLASSROOM_SLOW_LEARNERS",
        subject: "pedagogy",
        description_en: "Supporting students who need extra help",
        description_hi: Some("कमजोर छात्रों की मदद करना"),
        description_kn: Some("ಹೆಚ್ಚುವರಿ ಸಹಾಯ ಬೇಕಾದ ವಿದ್ಯಾರ್ಥಿಗಳಿಗೆ ಬೆಂಬಲ"),
        grade: "all",
        synonyms: &[
            (En, "slow learners"),
            (En, "struggling students"),
            (En, "students falling behind"),
            (En, "student engagement low"),
            (En, "low engagement"),
            (Kn, "ನಿಧಾನ ಕಲಿಕೆ"),
            (Kn, "ಹಿಂದುಳಿದ ವಿದ್ಯಾರ್ಥಿಗಳು"),
            (Hi, "धीमी गति से सीखने वाले"),
            (Hi, "पिछड़े छात्र"),
        ],
    },
    SeedConcept {
        id: "SCI_PHY_TEMPERATURE",
        subject: "science",
        description_en: "Teaching the abstract concept of temperature and heat measurement",
        description_hi: Some("तापमान और गर्मी मापना"),
        description_kn: Some("ತಾಪಮಾನ ಮತ್ತು ಶಾಖ ಮಾಪನ"),
        grade: "6",
        synonyms: &[
            (En, "temperature"),
            (En, "heat"),
            (En, "thermometer"),
            (En, "hot and cold"),
            (En, "measuring temperature"),
            (Kn, "ತಾಪಮಾನ"),
            (Kn, "ಉಷ್ಣತೆ"),
            (Hi, "तापमान"),
            (Hi, "गर्मी"),
        ],
    },
    SeedConcept {
        id: "SCI_BIO_HUMAN_BODY",
        subject: "science",
        description_en: "Human body parts and systems",
        description_hi: Some("मानव शरीर के अंग और तंत्र"),
        description_kn: Some("ಮಾನವ ದೇಹದ ಭಾಗಗಳು ಮತ್ತು ವ್ಯವಸ್ಥೆಗಳು"),
        grade: "5",
        synonyms: &[
            (En, "human body"),
            (En, "body parts"),
            (En, "organs"),
            (En, "digestive system"),
            (En, "respiratory system"),
            (Kn, "ಮಾನವ ದೇಹ"),
            (Kn, "ದೇಹದ ಭಾಗಗಳು"),
            (Hi, "मानव शरीर"),
            (Hi, "शरीर के अंग"),
        ],
    },
    SeedConcept {
        id: "MATH_DIVISION",
        subject: "math",
        description_en: "Dividing numbers",
        description_hi: None,
        description_kn: None,
        grade: "4",
        synonyms: &[
            (En, "division"),
            (En, "divide"),
            (En, "sharing equally"),
            (Kn, "ಭಾಗಾಕಾರ"),
            (Hi, "भाग"),
            (Hi, "विभाजन"),
        ],
    },
    SeedConcept {
        id: "CLASSROOM_NOISE",
        subject: "pedagogy",
        description_en: "Managing classroom noise levels",
        description_hi: None,
        description_kn: None,
        grade: "all",
        synonyms: &[
            (En, "classroom noise"),
            (En, "noisy classroom"),
            (En, "students talking"),
            (En, "too much noise"),
            (Kn, "ತರಗತಿಯಲ್ಲಿ ಗದ್ದಲ"),
            (Hi, "कक्षा में शोर"),
        ],
    },
    SeedConcept {
        id: "SCI_ENV_WATER_CYCLE",
        subject: "science",
        description_en: "Water cycle and evaporation",
        description_hi: None,
        description_kn: None,
        grade: "5",
        synonyms: &[
            (En, "water cycle"),
            (En, "evaporation"),
            (En, "rain"),
            (En, "condensation"),
            (Kn, "ನೀರಿನ ಚಕ್ರ"),
            (Kn, "ಆವಿಯಾಗುವಿಕೆ"),
            (Hi, "जल चक्र"),
            (Hi, "वाष्पीकरण"),
        ],
    },
    SeedConcept {
        id: "SCI_ENV_AIR_POLLUTION",
        subject: "science",
        description_en: "Air pollution and its effects",
        description_hi: None,
        description_kn: None,
        grade: "6",
        synonyms: &[
            (En, "air pollution"),
            (En, "pollution"),
            (En, "smog"),
            (En, "clean air"),
            (En, "air quality"),
            (Kn, "ವಾಯು ಮಾಲಿನ್ಯ"),
            (Kn, "ಗಾಳಿ ಮಾಲಿನ್ಯ"),
            (Hi, "वायु प्रदूषण"),
            (Hi, "हवा प्रदूषण"),
            (Hi, "प्रदूषण"),
        ],
    },
    SeedConcept {
        id: "SCI_ENV_PLANTS",
        subject: "science",
        description_en: "Plants, trees and their importance",
        description_hi: None,
        description_kn: None,
        grade: "4",
        synonyms: &[
            (En, "plants"),
            (En, "trees"),
            (En, "gardening"),
            (En, "plant parts"),
            (Kn, "ಸಸ್ಯಗಳು"),
            (Kn, "ಮರಗಳು"),
            (Hi, "पौधे"),
            (Hi, "पेड़"),
            (Hi, "वृक्ष"),
        ],
    },
    SeedConcept {
        id: "SCI_ENV_ANIMALS",
        subject: "science",
        description_en: "Animals and their habitats",
        description_hi: None,
        description_kn: None,
        grade: "4",
        synonyms: &[
            (En, "animals"),
            (En, "wildlife"),
            (En, "animal habitats"),
            (En, "zoo animals"),
            (Kn, "ಪ್ರಾಣಿಗಳು"),
            (Kn, "ವನ್ಯಜೀವಿ"),
            (Hi, "जानवर"),
            (Hi, "पशु"),
            (Hi, "वन्यजीव"),
        ],
    },
    SeedConcept {
        id: "MATH_ADDITION",
        subject: "math",
        description_en: "Adding numbers",
        description_hi: None,
        description_kn: None,
        grade: "2",
        synonyms: &[
            (En, "addition"),
            (En, "adding"),
            (En, "sum"),
            (En, "plus"),
            (Kn, "ಸಂಕಲನ"),
            (Kn, "ಕೂಡಿಸು"),
            (Hi, "जोड़"),
            (Hi, "योग"),
        ],
    },
    SeedConcept {
        id: "MATH_SUBTRACTION",
        subject: "math",
        description_en: "Subtracting numbers",
        description_hi: None,
        description_kn: None,
        grade: "2",
        synonyms: &[
            (En, "subtraction"),
            (En, "minus"),
            (En, "take away"),
            (Kn, "ವ್ಯವಕಲನ"),
            (Kn, "ಕಳೆಯುವುದು"),
            (Hi, "घटाव"),
            (Hi, "घटाना"),
        ],
    },
    SeedConcept {
        id: "LANG_HINDI_ALPHABET",
        subject: "language",
        description_en: "Hindi alphabet and letters",
        description_hi: None,
        description_kn: None,
        grade: "1",
        synonyms: &[
            (En, "hindi alphabet"),
            (En, "hindi letters"),
            (En, "devanagari"),
            (Hi, "हिंदी वर्णमाला"),
            (Hi, "अक्षर"),
            (Hi, "क ख ग"),
        ],
    },
    SeedConcept {
        id: "LANG_KANNADA_ALPHABET",
        subject: "language",
        description_en: "Kannada alphabet and letters",
        description_hi: None,
        description_kn: None,
        grade: "1",
        synonyms: &[
            (En, "kannada alphabet"),
            (En, "kannada letters"),
            (Kn, "ಕನ್ನಡ ವರ್ಣಮಾಲೆ"),
            (Kn, "ಅಕ್ಷರಗಳು"),
            (Kn, "ಅ ಆ ಇ"),
        ],
    },
];

const SAMPLE_CONTENT: &[SeedContent] = &[
    SeedContent {
        concept_id: "CLASSROOM_ATTENTION",
        subject: "pedagogy",
        title: "5 Quick Attention Grabbers",
        description: "Simple techniques to get students focused in 30 seconds. Clap patterns, countdown, silent signals.",
        content_type: "tip",
        language: En,
        content_url: "https://youtube.com/example1",
        source_type: SourceType::Internal,
        is_verified: true,
    },
    SeedContent {
        concept_id: "CLASSROOM_ATTENTION",
        subject: "pedagogy",
        title: "ಮಕ್ಕಳ ಗಮನ ಸೆಳೆಯುವ ವಿಧಾನಗಳು",
        description: "ತರಗತಿಯಲ್ಲಿ ಮಕ್ಕಳ ಗಮನ ಸೆಳೆಯಲು ಸರಳ ತಂತ್ರಗಳು",
        content_type: "tip",
        language: Kn,
        content_url: "https://example.com/kn-attention-techniques",
        source_type: SourceType::Internal,
        is_verified: true,
    },
    SeedContent {
        concept_id: "SCI_BIO_PHOTOSYNTHESIS",
        subject: "science",
        title: "Role-Play 'The Leaf Factory'",
        description: "Assign students roles like 'Sun', 'Water', and 'CO2' to enter a circle (the leaf). Have them trade 'energy tokens' to create a 'Glucose' student, making the chemical reaction visible and fun.",
        content_type: "activity",
        language: En,
        content_url: "https://youtube.com/photosynthesis-roleplay",
        source_type: SourceType::Internal,
        is_verified: true,
    },
    SeedContent {
        concept_id: "SCI_BIO_PHOTOSYNTHESIS",
        subject: "science",
        title: "Simple Leaf Breath Experiment",
        description: "Place a leaf in water under sunlight and observe oxygen bubbles forming. Great visual demonstration of photosynthesis.",
        content_type: "activity",
        language: En,
        content_url: "https://example.com/leaf-breath-experiment",
        source_type: SourceType::Internal,
        is_verified: true,
    },
    SeedContent {
        concept_id: "MATH_FRACTIONS",
        subject: "math",
        title: "Teaching Fractions with Pizza",
        description: "Use pizza slices to explain fractions visually. Cut paper pizzas into halves, quarters, eighths.",
        content_type: "activity",
        language: En,
        content_url: "https://example.com/fraction-pizza",
        source_type: SourceType::Internal,
        is_verified: true,
    },
    SeedContent {
        concept_id: "SCI_PHY_TEMPERATURE",
        subject: "science",
        title: "Three-Bowl Water Experiment",
        description: "Place three bowls: one with cold water, one with lukewarm, and one with warm. Have a student dip hands in cold and warm first, then both in lukewarm to show how 'feeling' temperature is relative while a thermometer gives an exact measure.",
        content_type: "activity",
        language: En,
        content_url: "https://youtube.com/temperature-experiment",
        source_type: SourceType::Internal,
        is_verified: true,
    },
    SeedContent {
        concept_id: "SCI_PHY_TEMPERATURE",
        subject: "science",
        title: "DIY Thermometer Activity",
        description: "Build a simple thermometer using a bottle, straw, and colored water. Students observe liquid rising as temperature increases.",
        content_type: "activity",
        language: En,
        content_url: "https://example.com/diy-thermometer",
        source_type: SourceType::Internal,
        is_verified: true,
    },
    SeedContent {
        concept_id: "SCI_ENV_WATER_CYCLE",
        subject: "science",
        title: "Water Cycle Song and Actions",
        description: "Use a catchy song with hand gestures to explain Evaporation (hands up), Condensation (hands together), and Precipitation (fingers like rain). This helps students memorize the sequence through movement and rhythm.",
        content_type: "video",
        language: En,
        content_url: "https://youtube.com/water-cycle-song",
        source_type: SourceType::External,
        is_verified: false,
    },
    SeedContent {
        concept_id: "SCI_ENV_WATER_CYCLE",
        subject: "science",
        title: "Water Cycle in a Bag",
        description: "Create a mini water cycle using a ziplock bag, water, and blue food coloring. Tape to a sunny window and watch evaporation and condensation happen!",
        content_type: "activity",
        language: En,
        content_url: "https://example.com/water-cycle-bag",
        source_type: SourceType::External,
        is_verified: false,
    },
    SeedContent {
        concept_id: "CLASSROOM_DISCIPLINE",
        subject: "pedagogy",
        title: "The Quiet Signal Technique",
        description: "Establish a silent hand signal that means 'stop and listen'. Practice it daily until it becomes automatic for students.",
        content_type: "tip",
        language: En,
        content_url: "https://example.com/quiet-signal",
        source_type: SourceType::Internal,
        is_verified: true,
    },
    SeedContent {
        concept_id: "CLASSROOM_SLOW_LEARNERS",
        subject: "pedagogy",
        title: "Peer Buddy System",
        description: "Pair struggling students with helpful classmates. The buddy explains concepts in kid-friendly language and both benefit from the interaction.",
        content_type: "tip",
        language: En,
        content_url: "https://example.com/peer-buddy-system",
        source_type: SourceType::Internal,
        is_verified: true,
    },
    SeedContent {
        concept_id: "SCI_PHY_MOTION",
        subject: "science",
        title: "Toy Car Ramp Experiment",
        description: "Use toy cars and ramps of different heights to demonstrate how gravity affects speed. Students predict and measure distances.",
        content_type: "activity",
        language: En,
        content_url: "https://example.com/toy-car-ramp",
        source_type: SourceType::Internal,
        is_verified: true,
    },
];

/// What one `apply` run actually added
#[derive(Debug, Default, Clone, Copy)]
pub struct SeedSummary {
    pub concepts: usize,
    pub synonyms: usize,
    pub content_items: usize,
}

/// Load the catalog into the store. Safe to run repeatedly.
pub async fn apply(pool: &SqlitePool) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for seed in CATALOG {
        if concepts::concept_exists(pool, seed.id).await? {
            tracing::debug!(concept_id = seed.id, "already present; skipping");
            continue;
        }

        let concept = Concept {
            concept_id: seed.id.to_string(),
            subject: seed.subject.to_string(),
            description_en: Some(seed.description_en.to_string()),
            description_hi: seed.description_hi.map(str::to_string),
            description_kn: seed.description_kn.map(str::to_string),
            grade: seed.grade.to_string(),
        };
        concepts::insert_concept(pool, &concept).await?;
        summary.concepts += 1;

        for (language, term) in seed.synonyms {
            synonyms::insert_synonym(pool, seed.id, *language, term).await?;
            summary.synonyms += 1;
        }
        tracing::info!(concept_id = seed.id, "seeded concept");
    }

    for item in SAMPLE_CONTENT {
        if content::find_by_url(pool, item.content_url).await?.is_some() {
            continue;
        }

        let row = ContentItem {
            id: Uuid::new_v4().to_string(),
            concept_id: item.concept_id.to_string(),
            uploaded_by: Some("demo-teacher".to_string()),
            subject: Some(item.subject.to_string()),
            grade: None,
            language: item.language,
            content_type: item.content_type.to_string(),
            title: item.title.to_string(),
            content_url: item.content_url.to_string(),
            description: Some(item.description.to_string()),
            summary: None,
            source_type: item.source_type,
            is_verified: item.is_verified,
            created_at: Utc::now(),
        };
        content::insert_or_fetch_by_url(pool, &row).await?;
        summary.content_items += 1;
    }

    tracing::info!(
        concepts = summary.concepts,
        synonyms = summary.synonyms,
        content_items = summary.content_items,
        "seed catalog applied"
    );
    Ok(summary)
}
