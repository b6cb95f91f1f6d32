use std::collections::HashSet;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::BuildError;
use crate::export::OPTION_DELIMITER;
use crate::spec::question::{QuestionType, ScaleBounds};

const GROUP_CODE_PATTERN: &str = "^[A-Za-z0-9]+$";
const MAX_ID_WIDTH: usize = 9;

/// Replaced by the skill name in skill-section prompts.
pub const SKILL_PLACEHOLDER: &str = "{skill}";

/// One organizational group respondents can belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GroupDescriptor {
    pub order_index: u32,
    pub code: String,
    pub display_name: String,
    #[serde(default)]
    pub extra_question_count: u32,
}

impl GroupDescriptor {
    pub fn new(order_index: u32, code: &str, display_name: &str, extra_question_count: u32) -> Self {
        Self {
            order_index,
            code: code.into(),
            display_name: display_name.into(),
            extra_question_count,
        }
    }

    /// Choice label used by the "current position" question.
    pub fn position_label(&self) -> String {
        format!("{} - {}", self.code, self.display_name)
    }
}

/// One competency evaluated for every respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SkillDescriptor {
    pub name: String,
    pub description: String,
}

impl SkillDescriptor {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Where a templated question takes its options from, when not listed inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OptionSource {
    /// One option per group, ascending `order_index`.
    Groups,
}

/// A fixed question inside a section template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateQuestion {
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub prompt: String,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_from: Option<OptionSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleBounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

fn default_required() -> bool {
    true
}

impl TemplateQuestion {
    fn new(kind: QuestionType, prompt: &str, required: bool) -> Self {
        Self {
            kind,
            prompt: prompt.into(),
            required,
            options: Vec::new(),
            options_from: None,
            scale: None,
            help_text: None,
        }
    }

    fn help(mut self, text: &str) -> Self {
        self.help_text = Some(text.into());
        self
    }

    fn choices(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|option| option.to_string()).collect();
        self
    }

    fn choices_from(mut self, source: OptionSource) -> Self {
        self.options_from = Some(source);
        self
    }

    fn scale(mut self, bounds: ScaleBounds) -> Self {
        self.scale = Some(bounds);
        self
    }
}

/// A section made of fixed questions, numbered `<id_prefix><seq>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SectionTemplate {
    pub name: String,
    pub id_prefix: String,
    pub backup_key: String,
    pub questions: Vec<TemplateQuestion>,
}

/// A section expanded from the skill list: a rating and an evidence item per skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SkillSection {
    pub name: String,
    pub id_prefix: String,
    pub backup_key: String,
    #[serde(default)]
    pub scale: ScaleBounds,
    /// Rating item prompt; `{skill}` is replaced by the skill name.
    pub rating_prompt: String,
    /// Appended to the skill description in the rating item's help text.
    pub rating_hint: String,
    /// Evidence item prompt; `{skill}` is replaced by the skill name.
    pub evidence_prompt: String,
    pub evidence_help: String,
}

impl SkillSection {
    pub fn rating_prompt_for(&self, skill: &SkillDescriptor) -> String {
        self.rating_prompt.replace(SKILL_PLACEHOLDER, &skill.name)
    }

    pub fn evidence_prompt_for(&self, skill: &SkillDescriptor) -> String {
        self.evidence_prompt.replace(SKILL_PLACEHOLDER, &skill.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionRule {
    Template(SectionTemplate),
    Skills(SkillSection),
}

impl SectionRule {
    pub fn name(&self) -> &str {
        match self {
            SectionRule::Template(template) => &template.name,
            SectionRule::Skills(skills) => &skills.name,
        }
    }

    pub fn id_prefix(&self) -> &str {
        match self {
            SectionRule::Template(template) => &template.id_prefix,
            SectionRule::Skills(skills) => &skills.id_prefix,
        }
    }

    pub fn backup_key(&self) -> &str {
        match self {
            SectionRule::Template(template) => &template.backup_key,
            SectionRule::Skills(skills) => &skills.backup_key,
        }
    }
}

/// Zero-padded sequence numbering shared by every section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IdScheme {
    pub width: usize,
}

impl Default for IdScheme {
    fn default() -> Self {
        Self { width: 2 }
    }
}

impl IdScheme {
    /// Largest sequence number representable in `width` digits.
    pub fn capacity(&self) -> Result<usize, BuildError> {
        self.check()?;
        Ok(10usize.pow(self.width as u32) - 1)
    }

    pub fn check(&self) -> Result<(), BuildError> {
        if self.width == 0 || self.width > MAX_ID_WIDTH {
            return Err(BuildError::InvalidIdWidth {
                width: self.width,
                max: MAX_ID_WIDTH,
            });
        }
        Ok(())
    }

    /// Formats `<prefix><sequence><suffix>`; sequences past the width are an error.
    pub fn format(
        &self,
        section: &str,
        prefix: &str,
        sequence: usize,
        suffix: &str,
    ) -> Result<String, BuildError> {
        if sequence > self.capacity()? {
            return Err(BuildError::SequenceOverflow {
                section: section.into(),
                sequence,
                width: self.width,
            });
        }
        Ok(format!(
            "{prefix}{sequence:0width$}{suffix}",
            width = self.width
        ))
    }
}

/// The complete declarative input of the schema builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleSet {
    pub groups: Vec<GroupDescriptor>,
    pub skills: Vec<SkillDescriptor>,
    pub sections: Vec<SectionRule>,
    #[serde(default)]
    pub id_scheme: IdScheme,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleSet {
    /// Built-in tables: 20 professional groups, 10 core skills, basic profile + skills.
    pub fn standard() -> Self {
        Self {
            groups: standard_groups(),
            skills: standard_skills(),
            sections: vec![
                SectionRule::Template(basic_profile_template()),
                SectionRule::Skills(core_skill_section()),
            ],
            id_scheme: IdScheme::default(),
        }
    }

    /// Groups sorted by ascending `order_index`.
    pub fn ordered_groups(&self) -> Vec<&GroupDescriptor> {
        let mut groups = self.groups.iter().collect::<Vec<_>>();
        groups.sort_by_key(|group| group.order_index);
        groups
    }

    /// Rejects rule tables the builder cannot expand into a valid schema.
    pub fn check(&self) -> Result<(), BuildError> {
        self.id_scheme.check()?;
        self.check_groups()?;
        self.check_skills()?;
        self.check_sections()
    }

    fn check_groups(&self) -> Result<(), BuildError> {
        if self.groups.is_empty() {
            return Err(BuildError::NoGroups);
        }
        let code_pattern = Regex::new(GROUP_CODE_PATTERN)?;
        let count = self.groups.len();
        let mut codes = HashSet::new();
        let mut indices = HashSet::new();
        for group in &self.groups {
            if !code_pattern.is_match(&group.code) {
                return Err(BuildError::InvalidGroupCode(group.code.clone()));
            }
            if group.display_name.trim().is_empty() {
                return Err(BuildError::Blank(format!(
                    "display name of group '{}'",
                    group.code
                )));
            }
            if group.order_index == 0 || group.order_index as usize > count {
                return Err(BuildError::OrderIndexOutOfRange {
                    code: group.code.clone(),
                    index: group.order_index,
                    count,
                });
            }
            if !codes.insert(group.code.as_str()) {
                return Err(BuildError::DuplicateGroupCode(group.code.clone()));
            }
            if !indices.insert(group.order_index) {
                return Err(BuildError::DuplicateOrderIndex(group.order_index));
            }
            ensure_no_delimiter(&group.code, &group.position_label())?;
        }
        Ok(())
    }

    fn check_skills(&self) -> Result<(), BuildError> {
        if self.skills.is_empty() {
            return Err(BuildError::NoSkills);
        }
        let mut names = HashSet::new();
        for skill in &self.skills {
            if skill.name.trim().is_empty() {
                return Err(BuildError::Blank("skill name".into()));
            }
            if !names.insert(skill.name.as_str()) {
                return Err(BuildError::DuplicateSkill(skill.name.clone()));
            }
        }
        Ok(())
    }

    fn check_sections(&self) -> Result<(), BuildError> {
        let mut names = HashSet::new();
        let mut prefixes = HashSet::new();
        let mut keys = HashSet::new();
        for section in &self.sections {
            let name = section.name();
            if name.trim().is_empty() {
                return Err(BuildError::Blank("section name".into()));
            }
            if !names.insert(name) {
                return Err(BuildError::DuplicateSection(name.into()));
            }
            if section.id_prefix().trim().is_empty() {
                return Err(invalid(name, "id prefix must not be blank"));
            }
            if !prefixes.insert(section.id_prefix()) {
                return Err(invalid(name, "id prefix is shared with another section"));
            }
            let key = section.backup_key();
            if key.trim().is_empty() || key == "metadata" {
                return Err(invalid(name, "backup key must be non-blank and not 'metadata'"));
            }
            if !keys.insert(key) {
                return Err(invalid(name, "backup key is shared with another section"));
            }
            match section {
                SectionRule::Template(template) => check_template(template)?,
                SectionRule::Skills(skills) => check_skill_section(skills)?,
            }
        }
        Ok(())
    }
}

fn check_template(template: &SectionTemplate) -> Result<(), BuildError> {
    let name = template.name.as_str();
    if template.questions.is_empty() {
        return Err(invalid(name, "template has no questions"));
    }
    for question in &template.questions {
        if question.prompt.trim().is_empty() {
            return Err(invalid(name, "question prompt must not be blank"));
        }
        let has_options = !question.options.is_empty() || question.options_from.is_some();
        match question.kind {
            QuestionType::SingleChoice => {
                if !question.options.is_empty() && question.options_from.is_some() {
                    return Err(invalid(
                        name,
                        &format!(
                            "choice question '{}' lists options and also takes them from a table",
                            question.prompt
                        ),
                    ));
                }
                if !has_options {
                    return Err(invalid(
                        name,
                        &format!("choice question '{}' has no options", question.prompt),
                    ));
                }
                for option in &question.options {
                    ensure_no_delimiter(&question.prompt, option)?;
                }
            }
            _ if has_options => {
                return Err(invalid(
                    name,
                    &format!("only choice questions take options ('{}')", question.prompt),
                ));
            }
            _ => {}
        }
        match (question.kind, &question.scale) {
            (QuestionType::LinearScale, Some(scale)) => check_scale(name, scale)?,
            (QuestionType::LinearScale, None) => {
                return Err(invalid(
                    name,
                    &format!("scale question '{}' has no bounds", question.prompt),
                ));
            }
            (_, Some(_)) => {
                return Err(invalid(
                    name,
                    &format!("only scale questions take bounds ('{}')", question.prompt),
                ));
            }
            (_, None) => {}
        }
    }
    Ok(())
}

fn check_skill_section(section: &SkillSection) -> Result<(), BuildError> {
    for prompt in [&section.rating_prompt, &section.evidence_prompt] {
        if !prompt.contains(SKILL_PLACEHOLDER) {
            return Err(invalid(
                &section.name,
                &format!("prompt '{}' must name the skill with {}", prompt, SKILL_PLACEHOLDER),
            ));
        }
    }
    check_scale(&section.name, &section.scale)
}

fn check_scale(section: &str, scale: &ScaleBounds) -> Result<(), BuildError> {
    if scale.min >= scale.max {
        return Err(invalid(
            section,
            &format!("scale {}..{} is empty", scale.min, scale.max),
        ));
    }
    Ok(())
}

fn ensure_no_delimiter(owner: &str, option: &str) -> Result<(), BuildError> {
    if option.contains(OPTION_DELIMITER) {
        return Err(BuildError::InvalidSection {
            section: owner.into(),
            message: format!(
                "option '{}' contains the '{}' delimiter",
                option, OPTION_DELIMITER
            ),
        });
    }
    Ok(())
}

fn invalid(section: &str, message: &str) -> BuildError {
    BuildError::InvalidSection {
        section: section.into(),
        message: message.into(),
    }
}

fn standard_groups() -> Vec<GroupDescriptor> {
    vec![
        GroupDescriptor::new(1, "BOD", "Quản lý cao cấp (BOD, TGĐ)", 4),
        GroupDescriptor::new(2, "TBU", "Trưởng BU", 4),
        GroupDescriptor::new(3, "TP", "Trưởng phòng", 4),
        GroupDescriptor::new(4, "TL", "Team Leader/Supervisor", 4),
        GroupDescriptor::new(5, "MSA", "Marketing, Sales, Admission", 5),
        GroupDescriptor::new(6, "IDS", "Matching & Export Services", 4),
        GroupDescriptor::new(7, "TC", "Tài chính - Kế toán", 4),
        GroupDescriptor::new(8, "NS", "Nhân sự", 4),
        GroupDescriptor::new(9, "IT", "Công nghệ thông tin", 4),
        GroupDescriptor::new(10, "HC", "Hành chính - Tổng vụ", 4),
        GroupDescriptor::new(11, "PC", "Pháp chế", 4),
        GroupDescriptor::new(12, "KZ", "Kaizen Yoshida School", 4),
        GroupDescriptor::new(13, "PS", "ProSkills", 4),
        GroupDescriptor::new(14, "EC", "EsuCare", 4),
        GroupDescriptor::new(15, "ET", "EsuTech", 4),
        GroupDescriptor::new(16, "KT", "Koka-Team (Việt Nam)", 4),
        GroupDescriptor::new(17, "EW", "EsuWorks", 4),
        GroupDescriptor::new(18, "AL", "ALESU", 4),
        GroupDescriptor::new(19, "JPC", "JPC - Truyền thông & Vận hành", 5),
        GroupDescriptor::new(20, "GA", "GateAwards - Tư vấn Du học", 4),
    ]
}

fn standard_skills() -> Vec<SkillDescriptor> {
    vec![
        SkillDescriptor::new(
            "Microsoft Office (Word, Excel, PowerPoint)",
            "Mức độ thành thạo sử dụng bộ MS Office",
        ),
        SkillDescriptor::new(
            "Giao tiếp và Thuyết trình",
            "Khả năng trình bày ý kiến, thuyết phục người khác",
        ),
        SkillDescriptor::new(
            "Làm việc nhóm",
            "Khả năng phối hợp, hỗ trợ đồng nghiệp hiệu quả",
        ),
        SkillDescriptor::new(
            "Quản lý thời gian",
            "Khả năng ưu tiên công việc, đáp ứng deadline",
        ),
        SkillDescriptor::new(
            "Giải quyết vấn đề",
            "Tư duy phân tích, tìm giải pháp cho tình huống khó",
        ),
        SkillDescriptor::new(
            "Học hỏi và Thích ứng",
            "Khả năng tiếp thu kiến thức mới, thích ứng thay đổi",
        ),
        SkillDescriptor::new(
            "Chăm sóc khách hàng",
            "Kỹ năng tư vấn, hỗ trợ, tạo sự hài lòng cho khách",
        ),
        SkillDescriptor::new(
            "Tư duy sáng tạo",
            "Khả năng đưa ra ý tưởng mới, cách làm khác biệt",
        ),
        SkillDescriptor::new(
            "Xử lý áp lực",
            "Khả năng làm việc hiệu quả trong môi trường căng thẳng",
        ),
        SkillDescriptor::new(
            "Trách nhiệm và Cam kết",
            "Mức độ hoàn thành công việc đúng hạn, chất lượng",
        ),
    ]
}

fn basic_profile_template() -> SectionTemplate {
    use QuestionType::*;

    let date_format = "Định dạng: DD/MM/YYYY";
    let language_scale = "1 = Không biết, 10 = Thành thạo như người bản xứ";
    SectionTemplate {
        name: "basic_info".into(),
        id_prefix: "B1_".into(),
        backup_key: "basic_questions".into(),
        questions: vec![
            TemplateQuestion::new(ShortText, "Họ và tên", true).help("Nhập họ tên đầy đủ của bạn"),
            TemplateQuestion::new(ShortText, "Mã nhân viên", true)
                .help("Mã số nhân viên của bạn tại Esuhai"),
            TemplateQuestion::new(SingleChoice, "Giới tính", true).choices(&["Nam", "Nữ", "Khác"]),
            TemplateQuestion::new(Date, "Ngày sinh", true).help(date_format),
            TemplateQuestion::new(ShortText, "Quê quán", false).help("Tỉnh/thành phố quê quán"),
            TemplateQuestion::new(SingleChoice, "Trình độ học vấn cao nhất", true).choices(&[
                "Trung học",
                "Trung cấp/Cao đẳng",
                "Đại học",
                "Thạc sĩ",
                "Tiến sĩ",
                "Khác",
            ]),
            TemplateQuestion::new(ShortText, "Chuyên ngành đã học", true)
                .help("Ví dụ: Kinh tế đối ngoại, Công nghệ thông tin..."),
            TemplateQuestion::new(SingleChoice, "Vị trí hiện tại tại Esuhai", true)
                .choices_from(OptionSource::Groups),
            TemplateQuestion::new(Date, "Ngày bắt đầu làm việc tại Esuhai", true).help(date_format),
            TemplateQuestion::new(LinearScale, "Tiếng Anh - Khả năng giao tiếp tổng thể", true)
                .scale(ScaleBounds::new(1, 10))
                .help(language_scale),
            TemplateQuestion::new(LinearScale, "Tiếng Nhật - Khả năng giao tiếp tổng thể", true)
                .scale(ScaleBounds::new(1, 10))
                .help(language_scale),
            TemplateQuestion::new(SingleChoice, "Chứng chỉ ngoại ngữ cao nhất", false).choices(&[
                "Không có", "TOEIC", "IELTS", "TOEFL", "JLPT", "NAT-TEST", "Khác",
            ]),
            TemplateQuestion::new(ShortText, "Điểm số chứng chỉ (nếu có)", false)
                .help("Ví dụ: TOEIC 750, IELTS 6.5, JLPT N3..."),
        ],
    }
}

fn core_skill_section() -> SkillSection {
    SkillSection {
        name: "core_skills".into(),
        id_prefix: "B2_".into(),
        backup_key: "core_questions".into(),
        scale: ScaleBounds::new(1, 10),
        rating_prompt: "Kỹ năng: {skill}".into(),
        rating_hint: "(1 = Rất yếu, 10 = Xuất sắc)".into(),
        evidence_prompt: "Ví dụ minh chứng cho kỹ năng '{skill}'".into(),
        evidence_help: "Nêu 1 ví dụ cụ thể trong công việc thể hiện kỹ năng này (50-100 từ)"
            .into(),
    }
}
