//! 持仓编辑文本解析测试

use fund_helper::errors::ParseError;
use fund_helper::services::holding_parser::{format_holdings, parse_holdings};

#[test]
fn test_parse_single_valid_line() {
    let holdings = parse_holdings("基金代码,持仓份额,持仓成本\n000001,100,1.0").unwrap();
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0].code, "000001");
    assert_eq!(holdings[0].share, 100.0);
    assert_eq!(holdings[0].cost, 1.0);
}

#[test]
fn test_parse_zeroes_derived_fields() {
    let holdings = parse_holdings("code,share,cost\n110022,2500.5,2.314").unwrap();
    let h = &holdings[0];
    assert!(h.name.is_empty(), "解析后名称应为空");
    assert_eq!(h.now, 0.0);
    assert_eq!(h.rate, 0.0);
    assert_eq!(h.value, 0.0);
    assert_eq!(h.profit, 0.0);
    assert_eq!(h.profit_rate(), 0.0);
}

#[test]
fn test_parse_multiple_lines_keeps_order() {
    let text = "基金代码,持仓份额,持仓成本\n000001,100,1.0\n110022,200,2.5\n161725,50,0.88";
    let holdings = parse_holdings(text).unwrap();
    let codes: Vec<&str> = holdings.iter().map(|h| h.code.as_str()).collect();
    assert_eq!(codes, vec!["000001", "110022", "161725"]);
}

#[test]
fn test_parse_duplicate_codes_allowed() {
    let text = "code,share,cost\n000001,100,1.0\n000001,50,1.2";
    let holdings = parse_holdings(text).unwrap();
    assert_eq!(holdings.len(), 2, "重复代码应各自独立成一条持仓");
    assert_eq!(holdings[0].share, 100.0);
    assert_eq!(holdings[1].share, 50.0);
}

#[test]
fn test_parse_five_digit_code_reports_line_number() {
    let err = parse_holdings("code,share,cost\n00001,100,1.0").unwrap_err();
    assert_eq!(err, ParseError::InvalidLineFormat(2));
}

#[test]
fn test_parse_error_line_number_counts_blank_lines() {
    // 第3行为空行被跳过，但行号仍按编辑器里的行计
    let text = "code,share,cost\n000001,100,1.0\n\n1234567,10,1.0";
    let err = parse_holdings(text).unwrap_err();
    assert_eq!(err, ParseError::InvalidLineFormat(4));
}

#[test]
fn test_parse_rejects_wrong_field_count() {
    let err = parse_holdings("code,share,cost\n000001,100").unwrap_err();
    assert_eq!(err, ParseError::InvalidLineFormat(2));

    let err = parse_holdings("code,share,cost\n000001,100,1.0,extra").unwrap_err();
    assert_eq!(err, ParseError::InvalidLineFormat(2), "多余字段应判为格式错误");
}

#[test]
fn test_parse_rejects_bad_numbers() {
    for line in ["000001,abc,1.0", "000001,100,x", "000001,NaN,1.0", "000001,inf,1.0"] {
        let text = format!("code,share,cost\n{}", line);
        let err = parse_holdings(&text).unwrap_err();
        assert_eq!(err, ParseError::InvalidLineFormat(2), "行内容: {}", line);
    }
}

#[test]
fn test_parse_rejects_non_positive() {
    for line in ["000001,0,1.0", "000001,-5,1.0", "000001,100,0", "000001,100,-0.5"] {
        let text = format!("code,share,cost\n{}", line);
        let err = parse_holdings(&text).unwrap_err();
        assert_eq!(err, ParseError::InvalidLineFormat(2), "行内容: {}", line);
    }
}

#[test]
fn test_parse_no_partial_result_on_late_error() {
    // 第2行合法、第3行非法，整体失败
    let err = parse_holdings("code,share,cost\n000001,100,1.0\nbad").unwrap_err();
    assert_eq!(err, ParseError::InvalidLineFormat(3));
}

#[test]
fn test_parse_header_only_is_no_valid_holdings() {
    assert_eq!(
        parse_holdings("基金代码,持仓份额,持仓成本").unwrap_err(),
        ParseError::NoValidHoldings
    );
    assert_eq!(
        parse_holdings("code,share,cost\n\n  \n").unwrap_err(),
        ParseError::NoValidHoldings
    );
}

#[test]
fn test_parse_empty_text_is_no_valid_holdings() {
    assert_eq!(parse_holdings("").unwrap_err(), ParseError::NoValidHoldings);
}

#[test]
fn test_format_then_parse_round_trip() {
    let text = "基金代码,持仓份额,持仓成本\n000001,100,1.05\n110022,2500.5,2.314";
    let holdings = parse_holdings(text).unwrap();
    let formatted = format_holdings(&holdings);
    let reparsed = parse_holdings(&formatted).unwrap();
    assert_eq!(reparsed, holdings, "回填文本再解析应得到相同持仓");
}
