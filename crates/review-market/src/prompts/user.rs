//! Templates for the market data block and the report prompt

/// Template name of the market data block
pub const MARKET_DATA: &str = "market_data.md";

/// Template name of the full report prompt
pub const REPORT_PROMPT: &str = "report_prompt.md";

// ============================================================================
// Market data block
// ============================================================================

pub(crate) const MARKET_DATA_TEMPLATE: &str = r"## 真实市场数据（来自 {{ source or '未知来源' }}）
**数据获取时间**：{{ fetched_at or '未知' }}
**数据来源**：{{ source or '未知来源' }}

### 主要指数表现
{% if indices %}
{% for index in indices %}
**{{ index.name }}**：
- 收盘点位：{{ index.close | fixed2 }}
- 涨跌幅：{{ index.change_pct | signed2 }}%
- 涨跌点：{{ index.change | signed2 }}
- 成交额：{{ index.turnover | fixed2 }}亿元
- 最高：{{ index.high | fixed2 }} | 最低：{{ index.low | fixed2 }}

{% endfor %}
{% else %}
暂无指数数据

{% endif %}
### 市场统计
- 上涨家数：{{ breadth.advancing }}
- 下跌家数：{{ breadth.declining }}
- 平盘家数：{{ breadth.unchanged }}
- 涨跌比：{{ breadth.advancing }}/{{ breadth.declining }}
- 涨停家数：{{ breadth.limit_up }}
- 跌停家数：{{ breadth.limit_down }}

### 板块表现
{% if sectors.gainers %}
**领涨板块TOP5**：
{% for sector in sectors.gainers[:5] %}
{{ loop.index }}. {{ sector.name }}：{{ sector.change_pct | signed2 }}% (领涨股：{{ sector.leader or '-' }})
{% endfor %}

{% endif %}
{% if sectors.losers %}
**领跌板块TOP5**：
{% for sector in sectors.losers[:5] %}
{{ loop.index }}. {{ sector.name }}：{{ sector.change_pct | signed2 }}%
{% endfor %}

{% endif %}
### 资金流向
{% if capital_flow.inflow %}
**主力净流入TOP5**：
{% for stock in capital_flow.inflow[:5] %}
{{ loop.index }}. {{ stock.name }}：{{ stock.net_amount | fixed2 }}亿元 ({{ stock.change_pct | signed2 }}%)
{% endfor %}

{% endif %}
{% if capital_flow.outflow %}
**主力净流出TOP5**：
{% for stock in capital_flow.outflow[:5] %}
{{ loop.index }}. {{ stock.name }}：{{ stock.net_amount | fixed2 }}亿元 ({{ stock.change_pct | signed2 }}%)
{% endfor %}

{% endif %}
### 北向资金
- 沪股通：{{ northbound.shanghai | fixed2 }}亿元
- 深股通：{{ northbound.shenzhen | fixed2 }}亿元
- **合计**：{{ northbound.total | fixed2 }}亿元
";

// ============================================================================
// Report prompt
// ============================================================================

pub(crate) const REPORT_PROMPT_TEMPLATE: &str = r"Please generate an A-Share evening review report for [{{ date }}] based on the following **real market data**.

{{ market_data }}

**Important Instructions**:
1. You MUST use the above real data as the foundation of the report
2. Index points, changes, and volumes MUST match the real data exactly
3. Up/down counts MUST match the real data exactly
4. Sector and capital flow data MUST be based on real data
5. DO NOT fabricate or modify any numerical data
6. You may provide reasonable market analysis and investment advice based on the data

## Report Requirements

### Report Structure (Markdown format)

#### 1. Market Overview
- Index performance (use real data, accurate to 2 decimal places)
- Market characteristics (based on real up/down counts, volume)
- Overseas market performance (brief mention)

#### 2. Sector Analysis
- Top 10 gaining sectors (use real data)
- Top 5 losing sectors (use real data)
- Analysis of sector drivers

#### 3. Capital Flow Analysis
- Top 10 main capital inflow/outflow (use real data)
- North-bound capital flow (use real data)
- Capital flow characteristics

#### 4. Hot Topics Analysis
- Based on leading sectors and capital flow, analyze 3-5 core themes
- Each theme includes: catalyst, industry logic, representative stocks

#### 5. Technical Analysis
- Shanghai Composite: technical analysis based on real price ({{ shanghai_close | fixed2 }})
- ChiNext: technical analysis based on real price ({{ chinext_close | fixed2 }})
- Support/resistance levels, trend judgment

#### 6. Investment Strategy
- Short-term strategy (1-2 weeks)
- Medium-term strategy (1-3 months)
- Reasonable suggestions based on market performance

#### 7. Risk Warning
- Five risk dimensions

#### 8. Summary and Outlook
- Daily market characteristics
- Market outlook

### Format Requirements

1. **Data Accuracy**:
   - All values must match the provided real data exactly
   - Keep 2 decimal places for points
   - Keep 2 decimal places for changes, with +/- sign
   - Keep 2 decimal places for volume

2. **Table Format**:
   - Use Markdown tables
   - Clear data alignment

3. **Symbol Usage**:
   - 🔥 Hot topics
   - 📊 Data analysis
   - 💰 Capital flow
   - ✅ Positive factors
   - ⚠️ Risk warning

4. **Language Style**:
   - Professional, objective, concise
   - Based on data analysis, avoid subjective speculation

### Data Source Attribution

Must note at the end of the report:

```markdown
---

## Data Source

- **Data Time**: {{ fetched_at or 'unknown' }}
- **Data Source**: {{ source or 'unknown' }}
- **Data Accuracy**: ✅ Real market data

## Disclaimer

This report is generated based on public market data and is for reference only.
It does not constitute any investment advice.
Investment involves risks. Please be cautious.

---

**Report Generated**: {{ generated_at }}
**Version**: v{{ version }}
```

Please generate the report strictly according to the above requirements, **ensuring the accuracy of all numerical data**.";
