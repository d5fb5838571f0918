use std::io::Write;

use mysql_runner::config::SplitterOptions;
use mysql_runner::error::SplitError;
use mysql_runner::splitter::{LINE_SEPARATOR, StatementReader};

fn script(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write script");
    file
}

fn read_all(contents: &str, options: SplitterOptions) -> Vec<String> {
    let file = script(contents);
    StatementReader::open(file.path(), options)
        .expect("open script")
        .collect::<Result<Vec<_>, _>>()
        .expect("read script")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn single_unterminated_statement() {
    assert_eq!(read_all("select * from foo", SplitterOptions::default()), vec!["select * from foo"]);
}

#[test]
fn terminator_on_its_own_line() {
    assert_eq!(
        read_all("select * from foo\n;\n", SplitterOptions::default()),
        vec![format!("select * from foo{LINE_SEPARATOR};")]
    );
}

#[test]
fn two_terminated_statements() {
    assert_eq!(
        read_all("select * from foo;\nselect * from bar;\n", SplitterOptions::default()),
        vec!["select * from foo;", "select * from bar;"]
    );
}

#[test]
fn begin_end_block_stays_whole() {
    let trigger = "
AFTER UPDATE ON some_table
FOR EACH ROW
BEGIN
    IF NEW.`flag` <> OLD.`flag`
    THEN
        insert into `logs` (`message`) values ('flag changed');
    END IF
END
";
    let result = read_all(trigger, SplitterOptions::default());

    assert_eq!(result.len(), 1, "{}", result.join("\n---\n"));
    assert_eq!(collapse_whitespace(&result[0]), collapse_whitespace(trigger));
}

#[test]
fn comment_lines_between_block_boundaries() {
    let src = "
CREATE PROCEDURE p()
BEGIN
-- first
/* second */
  BEGIN
-- third
    select 1;
  END;
-- fourth
END
select 2;
";
    let result = read_all(src, SplitterOptions::default());

    assert_eq!(result.len(), 2, "{}", result.join("\n---\n"));
    assert_eq!(
        collapse_whitespace(&result[0]),
        "CREATE PROCEDURE p() BEGIN BEGIN select 1; END; END"
    );
    assert_eq!(result[1], "select 2;");
}

#[test]
fn vendor_conditional_comment() {
    let src = "/*!50001 CREATE ALGORITHM=UNDEFINED VIEW `v` AS select 1 */\n";

    assert!(read_all(src, SplitterOptions::default()).is_empty());
    assert_eq!(
        read_all(src, SplitterOptions {
            include_vendor_comments: true
        }),
        vec![src.trim_end()]
    );
}

#[test]
fn multi_line_block_comment_is_skipped() {
    let src = "
/*
 * Dump header
 * select 'not a statement';
 */
select 1;
";
    assert_eq!(read_all(src, SplitterOptions::default()), vec!["select 1;"]);
}

#[test]
fn mysqldump_excerpt() {
    let src = "\
-- MySQL dump 10.13
--
-- Host: localhost    Database: shop
/*!40101 SET @OLD_CHARACTER_SET_CLIENT=@@CHARACTER_SET_CLIENT */;
/*!40101 SET NAMES utf8mb4 */;

DROP TABLE IF EXISTS `orders`;
CREATE TABLE `orders` (
  `id` int NOT NULL AUTO_INCREMENT,
  PRIMARY KEY (`id`)
) ENGINE=InnoDB;

LOCK TABLES `orders` WRITE;
INSERT INTO `orders` VALUES (1),(2);
UNLOCK TABLES;
";
    let kept = read_all(src, SplitterOptions {
        include_vendor_comments: true,
    });
    assert_eq!(kept.len(), 7);
    assert_eq!(kept[0], "/*!40101 SET @OLD_CHARACTER_SET_CLIENT=@@CHARACTER_SET_CLIENT */;");
    assert_eq!(kept[1], "/*!40101 SET NAMES utf8mb4 */;");
    assert_eq!(kept[2], "DROP TABLE IF EXISTS `orders`;");
    assert!(kept[3].starts_with("CREATE TABLE `orders` ("));
    assert!(kept[3].ends_with(") ENGINE=InnoDB;"));
    assert_eq!(kept[6], "UNLOCK TABLES;");

    // stripped vendor comments leave their trailing terminator behind
    let stripped = read_all(src, SplitterOptions::default());
    assert_eq!(&stripped[..2], &[";", ";"]);
    assert_eq!(stripped[2..], kept[2..]);
}

#[test]
fn missing_file_is_an_open_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = StatementReader::open(dir.path().join("nope.sql"), SplitterOptions::default())
        .err()
        .expect("open should fail");
    assert!(matches!(err, SplitError::Open { .. }), "got {err:?}");
}

#[test]
fn latin1_bytes_are_replaced_not_fatal() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"select 1;\ninsert into t values ('caf\xe9');\nselect 3;\n")
        .expect("write script");

    let mut reader = StatementReader::open(file.path(), SplitterOptions::default()).expect("open");
    assert_eq!(reader.next().unwrap().unwrap(), "select 1;");
    assert_eq!(reader.next().unwrap().unwrap(), "insert into t values ('caf\u{FFFD}');");
    // the raw byte count, not the length of the replacement text
    assert_eq!(reader.last_read_bytes(), 30);
    assert_eq!(reader.next().unwrap().unwrap(), "select 3;");
    assert!(reader.next().is_none());
}

#[test]
fn nested_blocks_under_custom_delimiter() {
    let src = "\
DELIMITER ;;
CREATE PROCEDURE p()
BEGIN
  BEGIN
    set @x = 1;
  END;
  select 1;
END;;
DELIMITER ;
select 2;
select 3;
";
    let got = read_all(src, SplitterOptions::default());
    assert_eq!(got.len(), 4, "got {got:?}");
    assert!(got[0].starts_with("DELIMITER ;;"));
    assert!(got[0].ends_with("END;;"));
    assert_eq!(&got[1..], ["DELIMITER ;", "select 2;", "select 3;"]);
}
