//! Naver-shaped HTML fixtures shared by pipeline and runner tests.

use crate::scraper::fake::FakePage;

pub const TITLE: &str = "국회 본회의 통과";

const STATS: &str = r#"
    <div class="u_cbox_comment_count_wrap">
        <ul>
            <li class="u_cbox_count_info"><span class="u_cbox_info_title">현재 댓글</span><span class="u_cbox_info_txt">1,200</span></li>
            <li class="u_cbox_count_info"><span class="u_cbox_info_title">작성자 삭제</span><span class="u_cbox_info_txt">30</span></li>
            <li class="u_cbox_count_info"><span class="u_cbox_info_title">규정 미준수</span><span class="u_cbox_info_txt">4</span></li>
        </ul>
    </div>
    <div class="u_cbox_chart_wrap">
        <div class="u_cbox_chart_sex">
            <div class="u_cbox_chart_male"><span class="u_cbox_chart_per">70%</span></div>
            <div class="u_cbox_chart_female"><span class="u_cbox_chart_per">30%</span></div>
        </div>
        <div class="u_cbox_chart_age">
            <div class="u_cbox_chart_progress"><span class="u_cbox_chart_per">2%</span><div class="u_cbox_chart_cnt"><span>10대</span></div></div>
            <div class="u_cbox_chart_progress"><span class="u_cbox_chart_per">15%</span><div class="u_cbox_chart_cnt"><span>20대</span></div></div>
            <div class="u_cbox_chart_progress"><span class="u_cbox_chart_per">25%</span><div class="u_cbox_chart_cnt"><span>30대</span></div></div>
            <div class="u_cbox_chart_progress"><span class="u_cbox_chart_per">28%</span><div class="u_cbox_chart_cnt"><span>40대</span></div></div>
            <div class="u_cbox_chart_progress"><span class="u_cbox_chart_per">20%</span><div class="u_cbox_chart_cnt"><span>50대</span></div></div>
            <div class="u_cbox_chart_progress"><span class="u_cbox_chart_per">10%</span><div class="u_cbox_chart_cnt"><span>60대 이상</span></div></div>
        </div>
    </div>"#;

fn article_page(comment_count: &str, extra: &str) -> String {
    format!(
        r#"<html><body>
            <em class="media_end_categorize_item">정치</em>
            <h2 id="title_area"><span>{TITLE}</span></h2>
            <span class="media_end_head_info_datestamp_time">2024-01-15 10:30</span>
            <em class="media_end_head_journalist_name">홍길동 기자</em>
            <div class="media_end_head_info_variety_like"><span class="u_likeit_text _count">56</span></div>
            <a class="media_end_head_cmtcount_button">{comment_count}</a>
            <article id="dic_area">본문 내용입니다.</article>
            {extra}
        </body></html>"#
    )
}

/// An article page, optionally with a link to its comments.
pub fn article(comment_count: &str, comment_button: bool) -> String {
    let button = if comment_button {
        r#"<a class="u_cbox_btn_view_comment">댓글 더보기</a>"#
    } else {
        ""
    };
    article_page(comment_count, button)
}

fn comment(no: u32, deleted: bool) -> String {
    format!(
        r#"<li class="u_cbox_comment" data-info="commentNo:'{no}',deleted:{deleted}">
            <span class="u_cbox_nick">reader{no}</span>
            <span class="u_cbox_contents">의견 {no}</span>
            <em class="u_cbox_cnt_recomm">{no}</em>
            <em class="u_cbox_cnt_unrecomm">0</em>
            <span class="u_cbox_date">2024.01.15. 11:0{no}</span>
        </li>"#
    )
}

fn comment_page(comments: &[String], more: bool) -> String {
    let more = if more {
        r#"<div class="u_cbox_paginate"><a class="u_cbox_btn_more">더보기</a></div>"#
    } else {
        ""
    };
    format!(
        r#"<html><body><ul class="u_cbox_list">{}</ul>{}</body></html>"#,
        comments.concat(),
        more
    )
}

/// Article with stats, a comment page, and one "more" click revealing a third comment.
pub fn article_with_comments() -> FakePage {
    let first = comment_page(&[comment(1, false), comment(2, true)], true);
    let all = comment_page(&[comment(1, false), comment(2, true), comment(3, false)], false);
    let button = r#"<a class="u_cbox_btn_view_comment">댓글 더보기</a>"#;

    FakePage::single(&article_page("1,234", &format!("{STATS}{button}")))
        .on_click(".u_cbox_btn_view_comment", &first)
        .on_click(".u_cbox_btn_more", &all)
}
