use assert_cmd::Command;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub template: PathBuf,
    pub state: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let template = tmp.path().join("weituo.docx");
        write_fixture_template(&template);
        let state = tmp.path().join("session.json");
        Self {
            _tmp: tmp,
            template,
            state,
        }
    }

    pub fn cmd(&self) -> Command {
        Command::cargo_bin("docfill").expect("binary builds")
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn template_str(&self) -> &str {
        self.template.to_str().expect("template path utf8")
    }

    pub fn state_str(&self) -> &str {
        self.state.to_str().expect("state path utf8")
    }

    pub fn init(&self) -> Value {
        self.run_json(&[
            "init",
            "--type",
            "weituo",
            "--template",
            self.template_str(),
            "--state",
            self.state_str(),
        ])
    }

    pub fn output_path(&self) -> PathBuf {
        self._tmp.path().join("filled.docx")
    }
}

/// Every grouped field of the weituo variant, plus the stamp lines fed
/// by aliases and one token no group declares.
pub const TEMPLATE_FIELDS: &[&str] = &[
    "合同编号",
    "签订日期",
    "签订地点",
    "甲方名称",
    "甲方统一社会信用代码",
    "甲方住所",
    "甲方联系人",
    "甲方联系电话",
    "乙方名称",
    "乙方统一社会信用代码",
    "乙方住所",
    "乙方联系人",
    "乙方联系电话",
    "处理目的",
    "处理方式",
    "数据类型",
    "处理期限",
    "☐含个人信息",
    "☐需要脱敏",
    "服务费金额",
    "服务费金额大写",
    "支付方式",
    "支付期限",
    "合同期限",
    "违约金比例",
    "争议解决方式",
    "甲方（盖章）",
    "乙方（盖章）",
    "备注",
];

fn write_fixture_template(path: &Path) {
    let mut body = String::new();
    for field in TEMPLATE_FIELDS {
        body.push_str(&format!(
            "<w:p><w:r><w:t>{field}：{{{{{field}}}}}</w:t></w:r></w:p>"
        ));
    }
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let file = std::fs::File::create(path).expect("create fixture template");
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#,
    )
    .unwrap();
    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#,
    )
    .unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(document.as_bytes()).unwrap();
    zip.finish().unwrap();
}
